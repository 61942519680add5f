//! SQLite export layer.
//!
//! RULE: Only store.rs talks to the database.
//! The store is a write-mostly sink for reporting on the current run.
//! Nothing reads a GameState back out of it.

use rusqlite::{params, Connection};
use crate::{
    config::GameConfig,
    error::SimResult,
    scenario::ScenarioType,
    state::{RunOutcome, TurnRecord},
    types::{Money, Share},
};

pub struct SimStore {
    conn: Connection,
}

/// Per-scenario profit aggregate for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioProfit {
    pub scenario:     String,
    pub turns:        i64,
    pub total_profit: Money,
}

impl SimStore {
    /// Open (or create) the export database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, config: &GameConfig, started_at: &str) -> SimResult<()> {
        let config_json = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT INTO run (run_id, config_json, started_at) VALUES (?1, ?2, ?3)",
            params![run_id, config_json, started_at],
        )?;
        Ok(())
    }

    pub fn record_outcome(
        &self,
        run_id: &str,
        outcome: RunOutcome,
        final_cash: Money,
        final_share: Share,
    ) -> SimResult<()> {
        self.conn.execute(
            "UPDATE run SET outcome = ?2, final_cash = ?3, final_share = ?4 WHERE run_id = ?1",
            params![run_id, outcome.as_str(), final_cash, final_share],
        )?;
        Ok(())
    }

    pub fn outcome_for_run(&self, run_id: &str) -> SimResult<Option<String>> {
        let outcome = self.conn.query_row(
            "SELECT outcome FROM run WHERE run_id = ?1",
            params![run_id],
            |row| row.get::<_, Option<String>>(0),
        )?;
        Ok(outcome)
    }

    // ── Turns ──────────────────────────────────────────────────

    pub fn append_turn(&self, run_id: &str, record: &TurnRecord) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO turn (run_id, period, scenario, strategy, profit, market_share_end)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id,
                record.period,
                record.scenario.name(),
                record.strategy,
                record.profit,
                record.market_share_end,
            ],
        )?;
        Ok(())
    }

    pub fn turns_for_run(&self, run_id: &str) -> SimResult<Vec<TurnRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT period, scenario, strategy, profit, market_share_end
             FROM turn WHERE run_id = ?1
             ORDER BY period ASC"
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?.collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(period, scenario, strategy, profit, market_share_end)| -> SimResult<TurnRecord> {
                Ok(TurnRecord {
                    period,
                    scenario: scenario.parse::<ScenarioType>()?,
                    strategy,
                    profit,
                    market_share_end,
                })
            })
            .collect()
    }

    pub fn profit_by_scenario(&self, run_id: &str) -> SimResult<Vec<ScenarioProfit>> {
        let mut stmt = self.conn.prepare(
            "SELECT scenario, COUNT(*), SUM(profit)
             FROM turn WHERE run_id = ?1
             GROUP BY scenario ORDER BY scenario ASC"
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(ScenarioProfit {
                scenario:     row.get(0)?,
                turns:        row.get(1)?,
                total_profit: row.get(2)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
