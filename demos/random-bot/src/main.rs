//! A demo bot that wanders the map with random actions and renders the
//! world to the console each tick.
//!
//! Run against a local server:
//!
//! ```text
//! cargo run -p random-bot -- --team-name crimson --tank-type light
//! ```

use rand::prelude::*;
use tankwire::prelude::*;

// ---------------------------------------------------------------------------
// Bot
// ---------------------------------------------------------------------------

struct RandomBot {
    grid_dimension: u32,
}

impl Bot for RandomBot {
    fn on_lobby_data(&mut self, lobby: &LobbyData) {
        self.grid_dimension = lobby.server_settings().grid_dimension;
        tracing::info!(
            my_id = lobby.my_id(),
            team = lobby.team_name(),
            grid = self.grid_dimension,
            "lobby joined"
        );
    }

    fn next_move(&mut self, state: &GameState) -> ResponseAction {
        let my_tank = state.my_tank();
        let teammate_tank = teammate_tank(state);

        render_map(state, my_tank, teammate_tank);

        // A dead tank passes to avoid server warnings.
        if my_tank.is_none() {
            return ResponseAction::Pass;
        }

        self.random_action()
    }

    fn on_game_ended(&mut self, result: &GameResult) {
        for team in result.teams() {
            tracing::info!(team = %team.name, score = ?team.score, "final score");
        }
    }

    fn on_warning(&mut self, kind: WarningKind, message: Option<&str>) {
        tracing::warn!(?kind, message, "server warning");
    }
}

impl RandomBot {
    fn random_action(&self) -> ResponseAction {
        let mut rng = rand::rng();
        let goto_x = rng.random_range(0..self.grid_dimension.max(1));
        let goto_y = rng.random_range(0..self.grid_dimension.max(1));
        let actions = [
            ResponseAction::Movement(MovementDirection::Forward),
            ResponseAction::Movement(MovementDirection::Backward),
            ResponseAction::Rotation {
                tank: Some(RotationDirection::Left),
                turret: Some(RotationDirection::Right),
            },
            ResponseAction::Rotation {
                tank: None,
                turret: Some(RotationDirection::Left),
            },
            ResponseAction::AbilityUse(Ability::FireBullet),
            ResponseAction::AbilityUse(Ability::FireDoubleBullet),
            ResponseAction::AbilityUse(Ability::UseLaser),
            ResponseAction::AbilityUse(Ability::UseRadar),
            ResponseAction::AbilityUse(Ability::DropMine),
            ResponseAction::AbilityUse(Ability::FireHealingBullet),
            ResponseAction::AbilityUse(Ability::FireStunBullet),
            ResponseAction::CaptureZone,
            ResponseAction::go_to(goto_x, goto_y),
            ResponseAction::Pass,
        ];
        actions
            .choose(&mut rng)
            .cloned()
            .unwrap_or(ResponseAction::Pass)
    }
}

/// The tank of the other player on my team, when both exist.
fn teammate_tank(state: &GameState) -> Option<&Tank> {
    let team = state.my_team()?;
    let teammate = team.players.iter().find(|p| p.id != state.my_id())?;
    state.tank_of(&teammate.id)
}

// ---------------------------------------------------------------------------
// Console rendering
// ---------------------------------------------------------------------------

/// Prints the grid, one glyph per tile, fog of war from the visibility
/// masks of my tank and my teammate's.
fn render_map(state: &GameState, my_tank: Option<&Tank>, teammate: Option<&Tank>) {
    print!("\x1B[2J\x1B[H"); // clear screen, home cursor
    println!("tick {}", state.tick());

    let visible_at = |x: usize, y: usize| -> bool {
        let sees = |tank: Option<&Tank>| {
            tank.and_then(|t| t.visibility.as_ref())
                .is_some_and(|mask| {
                    mask.get(y).and_then(|row| row.get(x)).copied() == Some(true)
                })
        };
        sees(my_tank) || sees(teammate)
    };

    for (y, row) in state.map().tiles().iter().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            let glyph = tile
                .entities()
                .first()
                .map(|entity| entity_glyph(entity, state, teammate))
                .unwrap_or_else(|| match tile.zone() {
                    Some(zone) => {
                        let letter = zone.index as char;
                        if visible_at(x, y) {
                            letter.to_ascii_uppercase()
                        } else {
                            letter.to_ascii_lowercase()
                        }
                    }
                    None if visible_at(x, y) => '.',
                    None => ' ',
                });
            print!("{glyph} ");
        }
        println!();
    }
}

/// Glyph for the first transmitted entity on a tile. Transmission order
/// is not physically meaningful; for rendering any occupant will do.
fn entity_glyph(
    entity: &TileEntity,
    state: &GameState,
    teammate: Option<&Tank>,
) -> char {
    match entity {
        TileEntity::Wall(wall) => match wall.wall_type {
            WallType::Solid => '#',
            WallType::Penetrable => '%',
        },
        TileEntity::Laser(laser) => match laser.orientation {
            Orientation::Horizontal => '-',
            Orientation::Vertical => '|',
        },
        TileEntity::Bullet(bullet) => match (bullet.direction, bullet.bullet_type) {
            (Some(Direction::Up), BulletType::Double) => '⇈',
            (Some(Direction::Right), BulletType::Double) => '⇉',
            (Some(Direction::Down), BulletType::Double) => '⇊',
            (Some(Direction::Left), BulletType::Double) => '⇇',
            (Some(Direction::Up), _) => '↑',
            (Some(Direction::Right), _) => '→',
            (Some(Direction::Down), _) => '↓',
            (Some(Direction::Left), _) => '←',
            (None, _) => '*',
        },
        TileEntity::Mine(mine) => {
            if mine.exploded() {
                'x'
            } else {
                'X'
            }
        }
        TileEntity::Tank(tank) => {
            if tank.owner_id == state.my_id() {
                'M'
            } else if teammate.is_some_and(|t| t.owner_id == tank.owner_id) {
                'T'
            } else {
                'P'
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

fn parse_args() -> Result<ConnectOptions, String> {
    let mut options = ConnectOptions::new(String::new(), TankType::Light);
    let mut team_name = None;
    let mut tank_type = None;

    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--host" => options.host = value()?,
            "-p" | "--port" => {
                options.port = value()?
                    .parse()
                    .map_err(|e| format!("invalid port: {e}"))?;
            }
            "-c" | "--code" => options.code = Some(value()?),
            "-n" | "--team-name" => team_name = Some(value()?),
            "-t" | "--tank-type" => {
                tank_type = Some(match value()?.to_lowercase().as_str() {
                    "light" => TankType::Light,
                    "heavy" => TankType::Heavy,
                    other => {
                        return Err(format!(
                            "invalid tank type: {other} (expected light or heavy)"
                        ));
                    }
                });
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    options.team_name = team_name.ok_or("missing --team-name")?;
    options.tank_type = tank_type.ok_or("missing --tank-type")?;
    Ok(options)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!(
                "usage: random-bot --team-name <name> --tank-type <light|heavy> \
                 [--host <host>] [--port <port>] [--code <code>]"
            );
            std::process::exit(2);
        }
    };

    let mut bot = RandomBot { grid_dimension: 0 };
    let session = match Session::connect(&options).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect");
            std::process::exit(1);
        }
    };

    if let Err(e) = session.run(&mut bot).await {
        tracing::error!(error = %e, "session ended with an error");
        std::process::exit(1);
    }
}
