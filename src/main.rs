#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::sync::Arc;
#[cfg(feature = "std")]
use std::time::Duration;

#[cfg(feature = "std")]
use battleship_view::{
    geometry::check_complete_layout, init_logging, random_layout, render_game, view, BoardCell,
    Coord, DerivedState, GamePhase, GameSession, InMemoryLedger, InMemoryPrivateStateStore, Ledger,
    PlayerSlot, PrivateStateStore, SessionConfig, ShipLayout,
};
#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play two sessions against each other on an in-memory ledger.
    Demo {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Delay before resubscribing after a dropped subscription")]
        retry_ms: Option<u64>,
        #[arg(long, help = "Drop every ledger subscription after this many shots")]
        drop_at: Option<usize>,
    },
    /// Check a layout such as "1,1,h 1,3,h 5,3,v 7,1,v 1,10,h".
    Validate {
        /// Five entries in ship order (Destroyer, Cruiser, Submarine,
        /// Battleship, Carrier), each `x,y,h`, `x,y,v` or `-`.
        layout: String,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            seed,
            retry_ms,
            drop_at,
        } => run_demo(seed, retry_ms, drop_at).await?,
        Commands::Validate { layout } => {
            let layout: ShipLayout = layout.parse()?;
            match check_complete_layout(&layout) {
                Ok(()) => println!("Layout {} is valid", layout),
                Err(e) => {
                    println!("Layout {} is invalid: {}", layout, e);
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

/// Random cell still empty on the viewer's target board.
#[cfg(feature = "std")]
fn pick_target(state: &DerivedState, rng: &mut SmallRng) -> Option<Coord> {
    let board = view::right_board(state);
    let open: Vec<Coord> = board
        .iter()
        .filter(|(_, cell)| *cell == BoardCell::Empty)
        .map(|(coord, _)| coord)
        .collect();
    if open.is_empty() {
        None
    } else {
        Some(open[rng.random_range(0..open.len())])
    }
}

#[cfg(feature = "std")]
async fn run_demo(seed: Option<u64>, retry_ms: Option<u64>, drop_at: Option<usize>) -> anyhow::Result<()> {
    let mut rng = if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    };
    let mut config = SessionConfig::from_env();
    if let Some(ms) = retry_ms {
        config = config.with_retry_delay(Duration::from_millis(ms));
    }

    let ledger = InMemoryLedger::new();
    let shared: Arc<dyn Ledger> = Arc::new(ledger.clone());
    let mut sessions = Vec::new();
    for _ in PlayerSlot::BOTH {
        let store: Arc<dyn PrivateStateStore> = Arc::new(InMemoryPrivateStateStore::new());
        let session = GameSession::start("demo", shared.clone(), store, config).await?;
        let layout = random_layout(&mut rng).ok_or_else(|| anyhow::anyhow!("no room for the fleet"))?;
        session.submit_layout(layout).await?;
        sessions.push(session);
    }
    let mut subs: Vec<_> = sessions.iter().map(GameSession::subscribe).collect();

    let seats = [GamePhase::WaitingP1, GamePhase::WaitingP2];
    for ((session, sub), seat) in sessions.iter().zip(subs.iter_mut()).zip(seats) {
        sub.wait_until(|s| s.phase == seat && s.own_layout.is_some_and(|l| l.is_complete()))
            .await
            .ok_or_else(|| anyhow::anyhow!("session closed"))?;
        session.join().await?;
    }

    let mut turn = PlayerSlot::Player1;
    let mut shots = 0usize;
    let finished = loop {
        let idx = turn.index();
        let state = subs[idx]
            .wait_until(|s| view::my_turn(s) || s.phase.is_terminal())
            .await
            .ok_or_else(|| anyhow::anyhow!("session closed"))?;
        if state.phase.is_terminal() {
            break state;
        }
        let cell = pick_target(&state, &mut rng).ok_or_else(|| anyhow::anyhow!("no cell left to fire at"))?;
        sessions[idx].submit_shot(cell).await?;
        subs[idx]
            .wait_until(|s| !view::my_turn(s))
            .await
            .ok_or_else(|| anyhow::anyhow!("session closed"))?;
        shots += 1;
        if drop_at == Some(shots) {
            println!("Dropping ledger subscriptions after {} shots", shots);
            ledger.drop_subscriptions()?;
        }
        turn = turn.opponent();
    };
    if let Some(winner) = finished.phase.winner() {
        println!("Game over: {} wins after {} shots", winner, shots);
    }

    for (slot, session) in PlayerSlot::BOTH.into_iter().zip(&sessions) {
        let state = session
            .subscribe()
            .wait_until(|s| s.phase.is_terminal())
            .await
            .ok_or_else(|| anyhow::anyhow!("session closed"))?;
        println!("\nView of {} after {} shots:", slot, shots);
        print!("{}", render_game(&state));
    }
    for session in &sessions {
        session.shutdown();
    }
    Ok(())
}
