//! sim-runner: headless runner for the dealer-network strategy simulation.
//!
//! Usage:
//!   sim-runner --policy adaptive --db run.db
//!   sim-runner --data-dir ./data --policy efficient
//!   sim-runner --ipc-mode

use anyhow::Result;
use paintsim_core::{
    config::GameConfig,
    controller::GameController,
    decision::{DealerIncentive, DecisionSet, DeliveryFrequency, InventoryPolicy},
    report::RunReport,
    scenario::ScenarioType,
    state::{GameState, TurnRecord},
    store::SimStore,
    types::{Period, RunId},
};
use std::env;
use std::io::{self, BufRead, Write};

const WELCOME: &str =
    "Welcome. The challenger has just launched. Your dealers are anxious. Make your Q1 decisions.";

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Submit {
        delivery:  String,
        inventory: String,
        incentive: String,
    },
    Restart,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    run_id:           RunId,
    period:           Period,
    horizon:          Period,
    cash:             f64,
    own_share:        f64,
    competitor_share: f64,
    /// None once the run is over: there is no next quarter to show.
    scenario:         Option<ScenarioType>,
    scenario_name:    Option<&'static str>,
    context:          Option<&'static str>,
    feedback:         &'static str,
    is_terminal:      bool,
    outcome:          Option<&'static str>,
    outcome_summary:  Option<&'static str>,
    history:          Vec<TurnRecord>,
}

/// Autoplay strategies for batch mode.
#[derive(Debug, Clone, Copy)]
enum Policy {
    Responsive,
    Efficient,
    Balanced,
    Adaptive,
}

impl Policy {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "responsive" => Some(Self::Responsive),
            "efficient"  => Some(Self::Efficient),
            "balanced"   => Some(Self::Balanced),
            "adaptive"   => Some(Self::Adaptive),
            _ => None,
        }
    }

    fn decide(&self, scenario: ScenarioType) -> DecisionSet {
        match self {
            Self::Responsive => DecisionSet::all_responsive(),
            Self::Efficient  => DecisionSet::all_efficient(),
            Self::Balanced => DecisionSet::new(
                DeliveryFrequency::Responsive,
                InventoryPolicy::HighBuffer,
                DealerIncentive::Standard,
            ),
            Self::Adaptive => match scenario {
                ScenarioType::Stable => DecisionSet::new(
                    DeliveryFrequency::Efficient,
                    InventoryPolicy::HighBuffer,
                    DealerIncentive::Standard,
                ),
                ScenarioType::Volatile | ScenarioType::FestivalSeason => {
                    DecisionSet::all_responsive()
                }
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let policy_name = string_arg(&args, "--policy").unwrap_or("adaptive");
    let db = string_arg(&args, "--db");
    let data_dir = string_arg(&args, "--data-dir");

    let config = match data_dir {
        Some(dir) => GameConfig::load(dir)?,
        None => GameConfig::default(),
    };
    let controller = GameController::new(config);

    if ipc_mode {
        return run_ipc_loop(&controller);
    }

    let policy = Policy::parse(policy_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown policy '{policy_name}'"))?;

    println!("Dealer Network Strategy Simulation - sim-runner");
    println!("  policy:    {policy_name}");
    println!("  db:        {}", db.unwrap_or("(none)"));
    println!("  data_dir:  {}", data_dir.unwrap_or("(built-in defaults)"));
    println!();
    println!("{WELCOME}");
    println!();

    let started_at = chrono::Utc::now().to_rfc3339();
    let state = autoplay(&controller, policy);
    print_summary(&controller, &state);

    if let Some(path) = db {
        export_run(&controller, &state, path, &started_at)?;
        println!();
        println!("Exported run {} to {path}", state.run_id());
    }

    Ok(())
}

fn autoplay(controller: &GameController, policy: Policy) -> GameState {
    let mut state = controller.start_run();
    while !state.is_terminal() {
        let draw = controller.current_scenario(&state);
        println!("Q{}: {} - {}", draw.period, draw.scenario, draw.context());
        let decision = policy.decide(draw.scenario);
        match controller.submit_decision(&mut state, decision) {
            Ok(result) => println!(
                "    {} / {} / {} -> score {} | profit {:.2} | {}",
                decision.delivery,
                decision.inventory,
                decision.incentive,
                result.service_score,
                result.profit,
                result.feedback_tier.message(),
            ),
            Err(e) => {
                log::warn!("autoplay stopped: {e}");
                break;
            }
        }
    }
    state
}

fn run_ipc_loop(controller: &GameController) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut state = controller.start_run();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => write_state(&mut stdout, controller, &state)?,
            IpcCommand::Restart => {
                state = controller.restart(state);
                write_state(&mut stdout, controller, &state)?;
            }
            IpcCommand::Submit { delivery, inventory, incentive } => {
                let submitted = DecisionSet::parse(&delivery, &inventory, &incentive)
                    .and_then(|decision| controller.submit_decision(&mut state, decision));
                match submitted {
                    Ok(_) => write_state(&mut stdout, controller, &state)?,
                    Err(e) => write_error(&mut stdout, &e.to_string())?,
                }
            }
        }
    }
    Ok(())
}

fn write_state(out: &mut impl Write, controller: &GameController, state: &GameState) -> Result<()> {
    let ui = build_ui_state(controller, state);
    writeln!(out, "{}", serde_json::to_string(&ui)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn build_ui_state(controller: &GameController, state: &GameState) -> UiState {
    let draw = (!state.is_terminal()).then(|| controller.current_scenario(state));
    let outcome = controller.outcome(state);
    UiState {
        run_id: state.run_id().to_string(),
        period: state.period(),
        horizon: controller.config().horizon,
        cash: state.cash(),
        own_share: state.own_share(),
        competitor_share: state.competitor_share(),
        scenario: draw.map(|d| d.scenario),
        scenario_name: draw.map(|d| d.scenario.name()),
        context: draw.map(|d| d.context()),
        feedback: state.last_feedback().map(|t| t.message()).unwrap_or(WELCOME),
        is_terminal: state.is_terminal(),
        outcome: outcome.map(|o| o.as_str()),
        outcome_summary: outcome.map(|o| o.summary()),
        history: state.history().to_vec(),
    }
}

fn print_summary(controller: &GameController, state: &GameState) {
    let report = RunReport::build(state, controller.config().starting_own_share);

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {}", state.run_id());
    if let Some(outcome) = controller.outcome(state) {
        println!("  outcome:        {}", outcome.summary());
    }
    println!("  quarters:       {}", report.turns_played);
    println!("  final cash:     {:.0} Cr", report.final_cash);
    println!("  final share:    {:.1}% ({:+.1})", report.final_share, report.share_change);
    println!("  competitor:     {:.1}%", state.competitor_share());
    println!("  total profit:   {:.2} Cr", report.total_profit);
    if let (Some((bq, bp)), Some((wq, wp))) = (report.best_quarter, report.worst_quarter) {
        println!("  best quarter:   Q{bq} ({bp:.2})");
        println!("  worst quarter:  Q{wq} ({wp:.2})");
    }

    println!();
    println!("=== ANALYST REPORT ===");
    for b in &report.by_scenario {
        println!(
            "  {:<16} | turns: {} | avg profit: {:.2}",
            b.scenario.name(),
            b.turns,
            b.average_profit
        );
    }
    println!();
    for r in state.history() {
        println!(
            "  Q{} | {:<16} | {:<10} | profit {:>8.2} | share {:>6.2}%",
            r.period,
            r.scenario.name(),
            r.strategy,
            r.profit,
            r.market_share_end
        );
    }
}

fn export_run(controller: &GameController, state: &GameState, path: &str, started_at: &str) -> Result<()> {
    let store = SimStore::open(path)?;
    store.migrate()?;
    store.insert_run(state.run_id(), controller.config(), started_at)?;
    for record in state.history() {
        store.append_turn(state.run_id(), record)?;
    }
    if let Some(outcome) = controller.outcome(state) {
        store.record_outcome(state.run_id(), outcome, state.cash(), state.own_share())?;
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
