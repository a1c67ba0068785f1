//! Table provisioning: keep, replace, or create the target table.
//!
//! One pass per run: check existence, let the decision provider pick keep or
//! overwrite, then create with either the inferred schema or a user-supplied
//! statement. A failing user statement gets exactly one automatic retry with
//! the inferred schema; a failing inferred statement is fatal immediately.
//! At most one DROP and one CREATE are ever issued.

use crate::decision::{Choice, DecisionProvider};
use crate::engine::StorageEngine;
use crate::error::{Result, SinkError};
use crate::schema::TableSchema;

/// What provisioning did to the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Existing table kept untouched; the loader appends into it
    Kept,
    /// Table did not exist and was created
    Created,
    /// Existing table was dropped and recreated
    Replaced,
}

/// Runs the provisioning state machine for `schema.name`.
///
/// # Errors
/// Propagates existence-check failures and fatal creation failures. A
/// `SchemaCreation` error always carries the literal failing statement.
pub async fn provision(
    engine: &mut dyn StorageEngine,
    decisions: &mut dyn DecisionProvider,
    schema: &TableSchema,
) -> Result<ProvisionOutcome> {
    let table = schema.name.as_str();

    if engine.table_exists(table).await? {
        tracing::info!("Found a pre-existing table named {}", table);
        let prompt =
            format!("Table {table} already exists. Keep and append (0) or overwrite (1)? ");
        if decisions.ask_binary(&prompt)? == Choice::Default {
            tracing::info!("Keeping the existing {} table; new rows will append", table);
            return Ok(ProvisionOutcome::Kept);
        }

        let drop = format!("DROP TABLE IF EXISTS {table}");
        tracing::info!("Dropping table {}", table);
        engine.execute(&drop).await?;
        create_table(engine, decisions, schema).await?;
        Ok(ProvisionOutcome::Replaced)
    } else {
        tracing::info!("No table named {} yet; creating it", table);
        create_table(engine, decisions, schema).await?;
        Ok(ProvisionOutcome::Created)
    }
}

/// Issues the CREATE, with the one-shot fallback from a user-supplied
/// statement to the inferred schema.
async fn create_table(
    engine: &mut dyn StorageEngine,
    decisions: &mut dyn DecisionProvider,
    schema: &TableSchema,
) -> Result<()> {
    let prompt = format!(
        "Create {} with the inferred schema (0) or supply your own statement (1)? ",
        schema.name
    );
    let user_supplied = decisions.ask_binary(&prompt)? == Choice::Alternate;

    let statement = if user_supplied {
        let supplied = decisions
            .ask_free_text(&format!("Enter the CREATE statement for {}: ", schema.name))?;
        if supplied.trim().is_empty() {
            tracing::warn!("Empty statement supplied; using the inferred schema instead");
            schema.create_statement()
        } else {
            supplied
        }
    } else {
        schema.create_statement()
    };

    match engine.execute(&statement).await {
        Ok(_) => {
            tracing::info!("Created table {}", schema.name);
            Ok(())
        }
        Err(first_failure) if user_supplied => {
            // One automatic retry with the inferred schema. Reserved words
            // without backticks are the usual culprit.
            tracing::warn!(
                "Supplied CREATE statement failed ({first_failure}); it was:\n\t{statement}\n\
                 Retrying with the inferred schema."
            );
            let fallback = schema.create_statement();
            engine
                .execute(&fallback)
                .await
                .map_err(|e| SinkError::creation_failed(fallback.clone(), e))?;
            tracing::info!("Created table {} with the inferred schema", schema.name);
            Ok(())
        }
        Err(failure) => Err(SinkError::creation_failed(statement, failure)),
    }
}
