//! # Maze CLI
//!
//! 迷宫闸门控制器命令行工具。
//!
//! ```bash
//! # 列出可用串口
//! maze-cli ports
//!
//! # 发现板并初始化闸门
//! maze-cli init --port /dev/ttyACM0
//!
//! # 初始化后移动闸门（板 0 升起 0 和 4，板 1 升起 2）
//! maze-cli move --port /dev/ttyACM0 --gates "0:0,4;1:2"
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use maze_sdk::prelude::*;
use maze_sdk::serial::SerialPortLink;
use std::time::Duration;

/// Maze CLI - 迷宫闸门控制器命令行工具
#[derive(Parser, Debug)]
#[command(name = "maze-cli")]
#[command(about = "Command-line interface for the maze gate controller", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出可用串口
    Ports,

    /// 连接、发现板并初始化闸门
    Init {
        #[command(flatten)]
        conn: ConnectionArgs,
    },

    /// 初始化后按目标配置移动闸门
    Move {
        #[command(flatten)]
        conn: ConnectionArgs,

        /// 目标配置，形如 "0:0,4;1:2"（板编号:闸门列表，分号分隔）
        #[arg(short, long)]
        gates: String,
    },
}

#[derive(clap::Args, Debug)]
struct ConnectionArgs {
    /// 串口名（如 /dev/ttyACM0、COM3）
    #[arg(short, long)]
    port: String,

    /// 响应超时（毫秒）
    #[arg(long, default_value_t = 5_000)]
    timeout_ms: u64,

    /// 打开串口时不拉高 DTR
    #[arg(long)]
    no_dtr: bool,
}

fn main() -> Result<()> {
    // 初始化日志（RUST_LOG 优先，默认 info）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("maze_cli=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ports => cmd_ports(),
        Commands::Init { conn } => {
            let maze = connect(&conn)?;
            discover_and_init(&maze)?;
            print_boards(&maze);
            Ok(())
        },
        Commands::Move { conn, gates } => {
            let desired = parse_gate_spec(&gates)?;
            let maze = connect(&conn)?;
            discover_and_init(&maze)?;
            cmd_move(&maze, &desired)
        },
    }
}

fn cmd_ports() -> Result<()> {
    let ports = list_available_ports().context("Failed to enumerate serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found");
    } else {
        for port in ports {
            println!("{port}");
        }
    }
    Ok(())
}

fn connect(conn: &ConnectionArgs) -> Result<Maze<SerialPortLink>> {
    MazeBuilder::new()
        .port(&conn.port)
        .response_timeout_ms(conn.timeout_ms)
        .assert_dtr(!conn.no_dtr)
        .open()
        .with_context(|| format!("Failed to open link on '{}'", conn.port))
}

/// 跑完系统初始化 + 闸门初始化两轮交换
fn discover_and_init(maze: &Maze<SerialPortLink>) -> Result<()> {
    maze.request_system_init()?;
    drain_exchange(maze)?;
    if maze.boards().is_empty() {
        bail!("No boards discovered; check wiring and firmware");
    }

    maze.request_gates_init()?;
    drain_exchange(maze)?;
    Ok(())
}

fn cmd_move(maze: &Maze<SerialPortLink>, desired: &[GateSet]) -> Result<()> {
    maze.request_move_gates(desired)?;
    let events = drain_exchange(maze)?;

    for event in &events {
        if let MazeEvent::GateMoveFailed { board, gate } = event {
            eprintln!("ERROR: gate {gate} on board {board} did not move");
        }
    }
    if events
        .iter()
        .any(|e| matches!(e, MazeEvent::MoveHadErrors { .. }))
    {
        bail!("Move completed with mismatched gates");
    }
    println!("Move succeeded");
    Ok(())
}

/// 收集一次交换产生的所有事件，直到请求解决且通道安静
fn drain_exchange(maze: &Maze<SerialPortLink>) -> Result<Vec<MazeEvent>> {
    let mut events = Vec::new();
    loop {
        match maze.events().recv_timeout(Duration::from_millis(200)) {
            Ok(event) => {
                if let MazeEvent::ResponseTimeout { request, deadline_ms } = &event {
                    bail!("No response for {request} within {deadline_ms} ms");
                }
                if let MazeEvent::ControllerError { error } = &event {
                    bail!("Firmware response inconsistent with topology: {error}");
                }
                tracing::info!("{event:?}");
                events.push(event);
            },
            Err(_) => {
                if !maze.is_awaiting_response() {
                    return Ok(events);
                }
            },
        }
    }
}

fn print_boards(maze: &Maze<SerialPortLink>) {
    for (index, board) in maze.boards().iter().enumerate() {
        println!(
            "board {index}: address 0x{:02X}, enabled gates {}",
            board.address(),
            board.enabled_gates()
        );
    }
}

/// 解析 "0:0,4;1:2" 形式的目标配置
///
/// 板编号必须按 0..n 连续给出可以省略尾部板（视为全落下），
/// 但不允许跳号，避免把配置错位发给别的板。
fn parse_gate_spec(spec: &str) -> Result<Vec<GateSet>> {
    let mut desired: Vec<GateSet> = Vec::new();
    for entry in spec.split(';').filter(|s| !s.trim().is_empty()) {
        let (board, gates) = entry
            .split_once(':')
            .with_context(|| format!("Invalid entry '{entry}': expected board:gate,gate"))?;
        let board: usize = board
            .trim()
            .parse()
            .with_context(|| format!("Invalid board index '{board}'"))?;
        if board != desired.len() {
            bail!("Board indices must be consecutive starting at 0, got {board}");
        }

        let mut set = GateSet::EMPTY;
        for gate in gates.split(',').filter(|s| !s.trim().is_empty()) {
            let gate: u8 = gate
                .trim()
                .parse()
                .with_context(|| format!("Invalid gate index '{gate}'"))?;
            if gate > 7 {
                bail!("Gate index {gate} out of range (0-7)");
            }
            set.insert(gate);
        }
        desired.push(set);
    }
    if desired.is_empty() {
        bail!("Empty gate specification");
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gate_spec() {
        let desired = parse_gate_spec("0:0,4;1:2").unwrap();
        assert_eq!(
            desired,
            vec![GateSet::from_indices([0, 4]), GateSet::from_indices([2])]
        );
    }

    #[test]
    fn test_parse_gate_spec_empty_board_entry() {
        let desired = parse_gate_spec("0:").unwrap();
        assert_eq!(desired, vec![GateSet::EMPTY]);
    }

    #[test]
    fn test_parse_gate_spec_rejects_gaps_and_bad_gates() {
        assert!(parse_gate_spec("1:0").is_err());
        assert!(parse_gate_spec("0:9").is_err());
        assert!(parse_gate_spec("").is_err());
    }
}
