//! JSON-lines command scripts.
//!
//! Each input line is one [`ScriptCommand`]; each produces exactly one output
//! line, `{"ok": ...}` or `{"error": "..."}`. A failing step does not stop the
//! script.

use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use palletrack_ai::{StorageAdvisor, suggest_storage};
use palletrack_catalog::{CatalogEntry, Category};
use palletrack_core::{CatalogEntryId, RecordId, SlotId};
use palletrack_inventory::{BatchMode, BatchOutcome, ReceiptLine, Warehouse};
use palletrack_locations::{SlotAddress, SlotRange};
use palletrack_reporting as reporting;

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ScriptCommand {
    AddSlot {
        prefix: String,
        aisle: String,
        slot: u32,
        level: u32,
    },
    AddSlotRange {
        prefix: String,
        aisle: String,
        slot_from: u32,
        slot_to: u32,
        level_from: u32,
        level_to: u32,
    },
    DeleteSlot {
        slot_id: SlotId,
    },
    Register {
        sku: String,
        name: String,
        category: Category,
        #[serde(default)]
        image_url: Option<String>,
    },
    /// Receive goods. Name and category come from the catalog unless given.
    Receive {
        sku: String,
        quantity: u64,
        lot_number: String,
        slot_id: SlotId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        category: Option<Category>,
    },
    Dispatch {
        sku: String,
        slot_id: SlotId,
        quantity: u64,
    },
    RemoveRecord {
        record_id: RecordId,
    },
    PlanDispatch {
        sku: String,
        lot_number: String,
        quantity: u64,
    },
    /// Plan and execute in one step.
    Pick {
        sku: String,
        lot_number: String,
        quantity: u64,
        #[serde(default)]
        mode: Option<BatchMode>,
    },
    Suggest {
        product_name: String,
        category: Category,
    },
    /// Inventory list filter over SKU, name, slot and lot.
    Search {
        #[serde(default)]
        query: String,
    },
    /// Distinct (SKU, lot) pairs matching a query.
    FindLots {
        #[serde(default)]
        query: String,
    },
    Catalog {
        #[serde(default)]
        query: String,
    },
    StockSummary,
    Dashboard {
        #[serde(default)]
        recent: Option<usize>,
    },
    Positions,
    Map,
}

/// Totals for one script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub failed: usize,
}

pub struct ScriptRunner {
    warehouse: Warehouse,
    config: AppConfig,
    advisor: Box<dyn StorageAdvisor>,
}

impl ScriptRunner {
    pub fn new(config: AppConfig, advisor: Box<dyn StorageAdvisor>) -> Self {
        Self {
            warehouse: Warehouse::new(),
            config,
            advisor,
        }
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    /// Run every line of `input`, writing one result line per step.
    /// Blank lines and `#` comments are skipped.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<RunSummary>
    where
        R: BufRead,
        W: Write,
    {
        let mut summary = RunSummary::default();

        for (index, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read script line {}", index + 1))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let result = self.run_line(trimmed).await;
            summary.steps += 1;
            if result.get("error").is_some() {
                summary.failed += 1;
            }
            writeln!(output, "{result}").context("failed to write step result")?;
        }

        output.flush().context("failed to flush output")?;
        tracing::info!(steps = summary.steps, failed = summary.failed, "script finished");
        Ok(summary)
    }

    /// Parse and execute one script line.
    pub async fn run_line(&mut self, line: &str) -> JsonValue {
        let outcome = match serde_json::from_str::<ScriptCommand>(line) {
            Ok(command) => self.execute(command).await,
            Err(e) => Err(anyhow::Error::new(e).context("invalid command")),
        };

        match outcome {
            Ok(value) => json!({ "ok": value }),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "script step failed");
                json!({ "error": format!("{err:#}") })
            }
        }
    }

    pub async fn execute(&mut self, command: ScriptCommand) -> anyhow::Result<JsonValue> {
        let wh = &mut self.warehouse;

        let value = match command {
            ScriptCommand::AddSlot {
                prefix,
                aisle,
                slot,
                level,
            } => {
                let slot_id = wh.add_slot(SlotAddress::new(&prefix, &aisle, slot, level)?)?;
                json!({ "slotId": slot_id })
            }
            ScriptCommand::AddSlotRange {
                prefix,
                aisle,
                slot_from,
                slot_to,
                level_from,
                level_to,
            } => {
                let range = SlotRange::new(&prefix, &aisle, slot_from..=slot_to, level_from..=level_to)?;
                let candidates = range.len();
                let created = wh.add_slot_range(range)?;
                json!({ "candidates": candidates, "created": created })
            }
            ScriptCommand::DeleteSlot { slot_id } => {
                wh.delete_slot(&slot_id)?;
                json!({ "deleted": slot_id })
            }
            ScriptCommand::Register {
                sku,
                name,
                category,
                image_url,
            } => {
                let entry = CatalogEntry::new(CatalogEntryId::new(), sku, name, category, image_url)?;
                wh.register_catalog_entry(entry.clone())?;
                serde_json::to_value(entry)?
            }
            ScriptCommand::Receive {
                sku,
                quantity,
                lot_number,
                slot_id,
                name,
                category,
            } => {
                let line = match (wh.catalog().get_by_sku(&sku), name, category) {
                    (Some(entry), name, category) => {
                        let mut line = ReceiptLine::from_catalog(entry, quantity, lot_number, slot_id);
                        if let Some(name) = name {
                            line.name = name;
                        }
                        if let Some(category) = category {
                            line.category = category;
                        }
                        line
                    }
                    (None, Some(name), Some(category)) => ReceiptLine {
                        sku,
                        name,
                        category,
                        quantity,
                        lot_number,
                        slot_id,
                        image_url: None,
                    },
                    (None, _, _) => {
                        bail!("SKU {sku} is not in the catalog; give name and category to receive it")
                    }
                };
                serde_json::to_value(wh.receive(line)?)?
            }
            ScriptCommand::Dispatch {
                sku,
                slot_id,
                quantity,
            } => serde_json::to_value(wh.dispatch(&sku, &slot_id, quantity)?)?,
            ScriptCommand::RemoveRecord { record_id } => {
                serde_json::to_value(wh.remove_record(record_id)?)?
            }
            ScriptCommand::PlanDispatch {
                sku,
                lot_number,
                quantity,
            } => serde_json::to_value(wh.plan_dispatch(&sku, &lot_number, quantity)?)?,
            ScriptCommand::Pick {
                sku,
                lot_number,
                quantity,
                mode,
            } => {
                let plan = wh.plan_dispatch(&sku, &lot_number, quantity)?;
                let outcome = wh.execute_pick_plan(&plan, mode.unwrap_or(self.config.batch_mode));
                json!({
                    "plan": plan,
                    "outcome": outcome_json(&outcome),
                })
            }
            ScriptCommand::Suggest {
                product_name,
                category,
            } => {
                let suggestion = suggest_storage(
                    self.advisor.as_ref(),
                    wh.slots(),
                    &product_name,
                    category,
                    self.config.suggestion_timeout,
                )
                .await;
                serde_json::to_value(suggestion)?
            }
            ScriptCommand::Search { query } => {
                let records: Vec<_> = wh.ledger().search(&query).collect();
                serde_json::to_value(records)?
            }
            ScriptCommand::FindLots { query } => serde_json::to_value(wh.ledger().lot_groups(&query))?,
            ScriptCommand::Catalog { query } => {
                let entries: Vec<_> = wh.catalog().find_by_sku_or_name(&query).collect();
                serde_json::to_value(entries)?
            }
            ScriptCommand::StockSummary => serde_json::to_value(reporting::stock_summary(wh.ledger()))?,
            ScriptCommand::Dashboard { recent } => serde_json::to_value(reporting::dashboard(
                wh,
                recent.unwrap_or(self.config.recent_entries),
            ))?,
            ScriptCommand::Positions => serde_json::to_value(reporting::position_report(wh))?,
            ScriptCommand::Map => serde_json::to_value(reporting::warehouse_map(wh.slots()))?,
        };

        Ok(value)
    }
}

fn outcome_json(outcome: &BatchOutcome) -> JsonValue {
    let lines: Vec<JsonValue> = outcome
        .lines
        .iter()
        .map(|l| match &l.result {
            Ok(receipt) => json!({ "slotId": l.line.slot_id, "dispatched": receipt }),
            Err(e) => json!({ "slotId": l.line.slot_id, "error": e.to_string() }),
        })
        .collect();

    json!({
        "mode": outcome.mode,
        "committed": outcome.committed,
        "succeeded": outcome.succeeded(),
        "failed": outcome.failed(),
        "lines": lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use palletrack_ai::HeuristicAdvisor;

    fn runner() -> ScriptRunner {
        ScriptRunner::new(AppConfig::default(), Box::new(HeuristicAdvisor::new()))
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let cmd: ScriptCommand = serde_json::from_str(
            r#"{"cmd":"add_slot_range","prefix":"R","aisle":"1","slot_from":1,"slot_to":2,"level_from":1,"level_to":2}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            ScriptCommand::AddSlotRange {
                prefix: "R".to_string(),
                aisle: "1".to_string(),
                slot_from: 1,
                slot_to: 2,
                level_from: 1,
                level_to: 2,
            }
        );

        let cmd: ScriptCommand = serde_json::from_str(r#"{"cmd":"stock_summary"}"#).unwrap();
        assert_eq!(cmd, ScriptCommand::StockSummary);

        let cmd: ScriptCommand =
            serde_json::from_str(r#"{"cmd":"pick","sku":"S","lot_number":"L","quantity":3,"mode":"atomic"}"#)
                .unwrap();
        assert!(matches!(cmd, ScriptCommand::Pick { mode: Some(BatchMode::AllOrNothing), .. }));
    }

    #[tokio::test]
    async fn domain_errors_are_reported_not_raised() {
        let mut runner = runner();
        let out = runner
            .run_line(r#"{"cmd":"delete_slot","slot_id":"R1.01.001"}"#)
            .await;
        assert_eq!(out["error"], "slot R1.01.001 does not exist");
    }

    #[tokio::test]
    async fn unknown_sku_needs_name_and_category() {
        let mut runner = runner();
        runner
            .run_line(r#"{"cmd":"add_slot","prefix":"R","aisle":"1","slot":1,"level":1}"#)
            .await;

        let out = runner
            .run_line(r#"{"cmd":"receive","sku":"X","quantity":1,"lot_number":"L","slot_id":"R1.01.001"}"#)
            .await;
        assert!(out["error"].as_str().unwrap().contains("not in the catalog"));

        let out = runner
            .run_line(
                r#"{"cmd":"receive","sku":"X","quantity":1,"lot_number":"L","slot_id":"R1.01.001","name":"Loose","category":"milk"}"#,
            )
            .await;
        assert_eq!(out["ok"]["quantity"], 1);
        assert_eq!(out["ok"]["category"], "milk");
    }

    #[tokio::test]
    async fn malformed_lines_are_errors() {
        let mut runner = runner();
        let out = runner.run_line(r#"{"cmd":"teleport"}"#).await;
        assert!(out["error"].as_str().unwrap().starts_with("invalid command"));
        let out = runner.run_line("not json").await;
        assert!(out.get("error").is_some());
    }
}
