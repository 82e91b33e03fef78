use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use contracts::SimConfig;
use range_api::serve;
use range_core::SimController;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("netrange <command>");
    println!("commands:");
    println!("  serve [addr]");
    println!("    default addr: 127.0.0.1:8000 (override with NETRANGE_ADDR)");
    println!("  status");
    println!("  start");
    println!("  stop");
    println!("  reset");
    println!("  step [n]");
    println!("    runs n mock-mode decision cycles locally (default 1)");
}

fn default_addr() -> String {
    env::var("NETRANGE_ADDR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "127.0.0.1:8000".to_string())
}

fn parse_socket_addr(value: Option<&String>) -> Result<SocketAddr, String> {
    let raw = value.map(String::to_string).unwrap_or_else(default_addr);
    raw.parse::<SocketAddr>()
        .map_err(|_| format!("invalid addr: {raw}"))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    init_tracing();

    let controller = SimController::new(SimConfig::default());

    match command {
        Some("serve") => {
            let addr = match parse_socket_addr(args.get(2)) {
                Ok(addr) => addr,
                Err(message) => {
                    eprintln!("{message}");
                    std::process::exit(2);
                }
            };
            println!("serving on http://{addr}");
            if let Err(err) = serve(addr, Arc::new(controller)).await {
                eprintln!("server failed: {err}");
                std::process::exit(1);
            }
        }
        Some("status") => {
            println!("{}", controller.status().await);
        }
        Some("start") => {
            let ack = controller.start().await;
            println!("{}", ack.message);
        }
        Some("stop") => {
            let ack = controller.stop().await;
            println!("{}", ack.message);
        }
        Some("reset") => {
            let ack = controller.reset().await;
            println!("{}", ack.message);
        }
        Some("step") => {
            let steps = args.get(2).and_then(|v| v.parse::<u64>().ok()).unwrap_or(1);
            for _ in 0..steps {
                let report = controller.step().await;
                let attacker = &report.agents.attacker;
                let defender = &report.agents.defender;
                println!(
                    "step {} attacker={} ({:.2}) defender={} ({:.2}) events={}",
                    report.step,
                    attacker.action.as_deref().unwrap_or("-"),
                    attacker.reward,
                    defender.action.as_deref().unwrap_or("-"),
                    defender.reward,
                    report.events.len()
                );
            }
            println!("{}", controller.status().await);
        }
        _ => {
            print_usage();
        }
    }
}
