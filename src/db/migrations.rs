use anyhow::{bail, Context, Result};
use rusqlite::{Connection, Transaction};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Schema version found on open and the version it was brought to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from: i32,
    pub to: i32,
}

impl SchemaUpgrade {
    pub fn applied(&self) -> bool {
        self.from != self.to
    }
}

pub fn run_migrations(conn: &mut Connection) -> Result<SchemaUpgrade> {
    let found: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    if found > CURRENT_SCHEMA_VERSION {
        bail!(
            "history database is at schema v{found}; this build reads up to v{CURRENT_SCHEMA_VERSION}"
        );
    }

    let upgrade = SchemaUpgrade {
        from: found,
        to: CURRENT_SCHEMA_VERSION,
    };
    if !upgrade.applied() {
        return Ok(upgrade);
    }

    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;

    for target in (found + 1)..=CURRENT_SCHEMA_VERSION {
        apply_migration(&tx, target)
            .with_context(|| format!("history schema migration to v{target} failed"))?;
    }

    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit history schema migrations")?;

    Ok(upgrade)
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> Result<()> {
    match version {
        1 => {
            tx.execute_batch(include_str!("schemas/schema_v1.sql"))
                .context("failed to execute schema_v1.sql")?;
            Ok(())
        }
        _ => bail!("unknown migration target version: {version}"),
    }
}
