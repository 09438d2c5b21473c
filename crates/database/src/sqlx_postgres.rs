use sqlx::{postgres::{PgArguments, PgRow}, Error as SqlxError, Executor, FromRow, Postgres};

/// Trait to define the schema of a database object for PostgreSQL.
pub trait SqlxSchema: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + Clone + std::fmt::Debug {
    /// The type of the primary key for this database object.
    type Id: Send + Sync + Clone + for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + 'static;

    const TABLE_NAME: &'static str;
    const ID_COLUMN_NAME: &'static str;
    /// Every column, in the order rows are selected.
    const COLUMNS: &'static [&'static str];
    /// Columns bound on insert. Database generated columns (serial ids, defaults) are left out.
    const INSERT_COLUMNS: &'static [&'static str];
    const CREATE_TABLE_SQL: &'static str;
    const INDEXES_SQL: &'static [&'static str];

    fn select_sql() -> String {
        format!("SELECT {} FROM {}", Self::COLUMNS.join(", "), Self::TABLE_NAME)
    }

    fn insert_sql() -> String {
        let placeholders = (1..=Self::INSERT_COLUMNS.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            Self::TABLE_NAME,
            Self::INSERT_COLUMNS.join(", "),
            placeholders,
            Self::COLUMNS.join(", ")
        )
    }
}

/// Trait for CRUD (Create, Read, Update, Delete) operations for PostgreSQL.
#[async_trait::async_trait]
pub trait SqlxCrud: SqlxSchema + Sized {
    /// Binds the struct fields to an insert query, in `INSERT_COLUMNS` order.
    fn bind_insert<'q>(&self, query: sqlx::query::QueryAs<'q, Postgres, Self, PgArguments>)
        -> sqlx::query::QueryAs<'q, Postgres, Self, PgArguments>;

    /// Creates a new record in the database and returns it as stored.
    async fn create<'e, E>(self, executor: E) -> Result<Self, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let sql = Self::insert_sql();
        self.bind_insert(sqlx::query_as::<_, Self>(&sql))
            .fetch_one(executor)
            .await
    }
}

/// Specifies the direction for ordering query results.
#[derive(Debug, Clone, Copy)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// A trait to allow for boxing of different types that can be encoded as sqlx arguments.
pub trait AsSqlxArg: Send + Sync {
    fn add_to_args(&self, args: &mut PgArguments) -> Result<(), SqlxError>;
}

impl<T> AsSqlxArg for T
where
    T: for<'a> sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
{
    fn add_to_args(&self, args: &mut PgArguments) -> Result<(), SqlxError> {
        use sqlx::Arguments;
        args.add(self.clone()).map_err(SqlxError::Encode)
    }
}

/// Represents a single filter condition for a database query.
pub struct FilterCondition {
    pub column: &'static str,
    pub operator: &'static str,
    /// Holds the value for the condition's placeholder, if any.
    pub value: Option<Box<dyn AsSqlxArg>>,
}

/// The WHERE / ORDER BY / LIMIT tail of a query, built up fluently and rendered against any
/// `SqlxSchema` table.
#[derive(Default)]
pub struct QueryCriteria {
    pub conditions: Vec<FilterCondition>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Vec<(&'static str, OrderDirection)>,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the row of `T` whose primary key is `id`.
    pub fn by_id<T: SqlxSchema>(id: T::Id) -> Self {
        Self::new().add_valued_filter(T::ID_COLUMN_NAME, "=", id)
    }

    /// Adds a filter condition that may or may not have a value.
    pub fn add_filter<V>(mut self, column: &'static str, operator: &'static str, value: Option<V>) -> Self
    where
        V: for<'a> ::sqlx::Encode<'a, Postgres> + ::sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
    {
        self.conditions.push(FilterCondition {
            column,
            operator,
            value: value.map(|v| Box::new(v) as Box<dyn AsSqlxArg>),
        });
        self
    }

    /// A convenience method for `add_filter` that requires a value.
    pub fn add_valued_filter<V>(self, column: &'static str, operator: &'static str, value: V) -> Self
    where
        V: for<'a> ::sqlx::Encode<'a, Postgres> + ::sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
    {
        self.add_filter(column, operator, Some(value))
    }

    pub fn limit(mut self, limit_val: i64) -> Self {
        self.limit = Some(limit_val);
        self
    }

    pub fn offset(mut self, offset_val: i64) -> Self {
        self.offset = Some(offset_val);
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: OrderDirection) -> Self {
        self.order_by.push((column, direction));
        self
    }

    /// Renders the WHERE clause only. Placeholders are numbered from `$1`.
    pub fn where_clause(&self) -> Result<(String, PgArguments), SqlxError> {
        let mut args = PgArguments::default();
        let mut parts = Vec::with_capacity(self.conditions.len());
        let mut index = 0;

        for condition in &self.conditions {
            match &condition.value {
                Some(value) => {
                    index += 1;
                    value.add_to_args(&mut args)?;
                    parts.push(format!("{} {} ${}", condition.column, condition.operator, index));
                }
                None => parts.push(format!("{} {}", condition.column, condition.operator)),
            }
        }

        let sql = if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        };

        Ok((sql, args))
    }

    /// Renders the full tail: WHERE, ORDER BY, LIMIT and OFFSET.
    pub fn build(&self) -> Result<(String, PgArguments), SqlxError> {
        let (mut sql, args) = self.where_clause()?;

        if !self.order_by.is_empty() {
            let order = self.order_by.iter()
                .map(|(column, direction)| format!("{} {}", column, direction.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(" ORDER BY {}", order));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        Ok((sql, args))
    }
}

/// Trait for finding records based on dynamic filter criteria.
#[async_trait::async_trait]
pub trait SqlxFilterQuery: SqlxSchema + Sized {
    async fn find_by_criteria<'e, E>(
        criteria: QueryCriteria,
        executor: E,
    ) -> Result<Vec<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let (tail, args) = criteria.build()?;
        let sql = format!("{}{}", Self::select_sql(), tail);
        sqlx::query_as_with::<_, Self, _>(&sql, args)
            .fetch_all(executor)
            .await
    }

    /// Finds a single optional record. Adds `LIMIT 1` unless the criteria already carry a limit.
    async fn find_one_by_criteria<'e, E>(
        mut criteria: QueryCriteria,
        executor: E,
    ) -> Result<Option<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        if criteria.limit.is_none() {
            criteria = criteria.limit(1);
        };
        let mut results = Self::find_by_criteria(criteria, executor).await?;
        Ok(results.pop())
    }

    async fn count_by_criteria<'e, E>(
        criteria: QueryCriteria,
        executor: E,
    ) -> Result<i64, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let (clause, args) = criteria.where_clause()?;
        let sql = format!("SELECT COUNT(*) FROM {}{}", Self::TABLE_NAME, clause);
        sqlx::query_scalar_with::<_, i64, _>(&sql, args)
            .fetch_one(executor)
            .await
    }

    async fn delete_by_criteria<'e, E>(
        criteria: QueryCriteria,
        executor: E,
    ) -> Result<u64, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let (clause, args) = criteria.where_clause()?;
        let sql = format!("DELETE FROM {}{}", Self::TABLE_NAME, clause);
        sqlx::query_with(&sql, args)
            .execute(executor)
            .await
            .map(|result| result.rows_affected())
    }
}

/// True when the error is a Postgres unique constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(err: &SqlxError) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
