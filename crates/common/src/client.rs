/// A long-lived handle to an external service, built once at startup and cloned into
/// request handlers.
#[async_trait::async_trait]
pub trait ModuleClient: Clone + Send + Sync + 'static {
    const NAME: &'static str;
    type Client;

    fn validate_env() -> bool;
    async fn setup_connection() -> anyhow::Result<Self>;

    fn get_client(&self) -> &Self::Client;
}

/// The subset of `vars` that are unset in the process environment.
pub fn missing_env_vars(vars: &[&'static str]) -> Vec<&'static str> {
    vars.iter()
        .copied()
        .filter(|var| std::env::var(var).is_err())
        .collect()
}

/// Declares a `ModuleClient` wrapping `client_type`. The setup block must evaluate to
/// `anyhow::Result<client_type>` and only runs once every listed env var is present.
#[macro_export]
macro_rules! define_module_client {
    {
        (struct $struct_name:ident, $client_name:expr)
        client_type: $client_type:ty,
        env: [ $( $env_var:literal ),* ],
        setup: $setup_logic:expr
    } => {
        #[derive(Clone)]
        pub struct $struct_name {
            client: std::sync::Arc<$client_type>,
        }

        impl $struct_name {
            pub fn from_client(client: $client_type) -> Self {
                Self { client: std::sync::Arc::new(client) }
            }
        }

        #[async_trait::async_trait]
        impl ::cardfolio_common::ModuleClient for $struct_name {
            const NAME: &'static str = $client_name;
            type Client = $client_type;

            fn validate_env() -> bool {
                let missing = ::cardfolio_common::missing_env_vars(&[ $( $env_var ),* ]);
                if !missing.is_empty() {
                    tracing::error!("[Client: {}] Missing environment variables: [{}]", $client_name, missing.join(", "));
                }
                missing.is_empty()
            }

            async fn setup_connection() -> anyhow::Result<Self> {
                if !Self::validate_env() {
                    anyhow::bail!("[Client: {}] cannot be set up without its environment", $client_name);
                }

                let client: anyhow::Result<$client_type> = $setup_logic.await;
                tracing::info!("[Client: {}] ready", $client_name);
                Ok(Self::from_client(client?))
            }

            fn get_client(&self) -> &Self::Client {
                &self.client
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_only_unset_vars() {
        assert!(missing_env_vars(&[]).is_empty());
        assert!(missing_env_vars(&["PATH"]).is_empty());
        assert_eq!(
            missing_env_vars(&["PATH", "CARDFOLIO_TEST_SURELY_UNSET_VAR"]),
            ["CARDFOLIO_TEST_SURELY_UNSET_VAR"]
        );
    }
}
