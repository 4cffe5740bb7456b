//! Builders for the two dynamic SQL shapes every controller needs: optional
//! ANDed filter predicates and partial-update SET clauses. Column names are
//! `&'static str` literals supplied at the call site, so the set of columns
//! that can appear in generated SQL is fixed at compile time; values are
//! always bound as positional parameters.

use serde_json::Value;

/// Accumulates optional filter predicates into a `WHERE` clause.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fixed predicate with no bound value, e.g. `deleted_at IS NULL`.
    pub fn condition(&mut self, predicate: &'static str) -> &mut Self {
        self.conditions.push(predicate.to_string());
        self
    }

    /// Adds `column = ?` when the value is present.
    pub fn eq_opt(&mut self, column: &'static str, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(value) = value {
            self.conditions.push(format!("{column} = ?"));
            self.params.push(value.into());
        }
        self
    }

    /// Adds `column >= ?` / `column <= ?` when the bound is present.
    pub fn ge_opt(&mut self, column: &'static str, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(value) = value {
            self.conditions.push(format!("{column} >= ?"));
            self.params.push(value.into());
        }
        self
    }

    pub fn le_opt(&mut self, column: &'static str, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(value) = value {
            self.conditions.push(format!("{column} <= ?"));
            self.params.push(value.into());
        }
        self
    }

    /// Adds `(a LIKE ? OR b LIKE ? ...)` over the given columns when a search
    /// term is present; the term is bound once per column as `%term%`.
    pub fn search_opt(&mut self, columns: &[&'static str], term: Option<&str>) -> &mut Self {
        if let Some(term) = term.filter(|t| !t.is_empty()) {
            let predicate = columns
                .iter()
                .map(|c| format!("{c} LIKE ?"))
                .collect::<Vec<_>>()
                .join(" OR ");
            self.conditions.push(format!("({predicate})"));
            for _ in columns {
                self.params.push(Value::String(format!("%{term}%")));
            }
        }
        self
    }

    /// `WHERE ...` (or an empty string when no predicates were added).
    pub fn clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> Vec<Value> {
        self.params.clone()
    }
}

/// Maps a set of present fields onto a parameterized `UPDATE ... SET` clause.
/// Absent fields never appear in the statement, so they stay untouched.
#[derive(Debug)]
pub struct UpdateBuilder {
    table: &'static str,
    assignments: Vec<String>,
    params: Vec<Value>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<Value>) -> &mut Self {
        self.assignments.push(format!("{column} = ?"));
        self.params.push(value.into());
        self
    }

    pub fn set_opt(&mut self, column: &'static str, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(value) = value {
            self.set(column, value);
        }
        self
    }

    /// Sets a raw SQL expression with no bound value, e.g.
    /// `updated_at = CURRENT_TIMESTAMP`.
    pub fn set_raw(&mut self, assignment: &'static str) -> &mut Self {
        self.assignments.push(assignment.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        // Raw assignments alone (timestamp touches) do not count as changes.
        self.params.is_empty()
    }

    /// Finalizes into `(sql, params)` keyed on `id = ?`.
    pub fn build(mut self, id: impl Into<Value>) -> (String, Vec<Value>) {
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            self.table,
            self.assignments.join(", ")
        );
        self.params.push(id.into());
        (sql, self.params)
    }
}
