use std::{fmt::Write as _, io, str::FromStr};

use anyhow::{bail, Context};
use clap::Parser;
use madduck::{
    availability,
    config::{DEFAULT_BOMB_THRESHOLD, DEFAULT_DESTROY_THRESHOLD},
    infection, Block, BlockColor, BlockFace, BlockId, Board, ConfigError, EngineConfig, GridPreset,
    Placement, PlacementEngine, PlacementOutcome, Position, Rotation, ShapeMatrix,
};
use recap::Recap;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(about, override_usage = "madduck [OPTIONS] < script.txt")]
struct Args {
    /// Smallest same-colour group that gets destroyed
    #[arg(long, default_value_t = DEFAULT_DESTROY_THRESHOLD)]
    destroy_threshold: usize,
    /// Groups larger than this score as a bomb
    #[arg(long, default_value_t = DEFAULT_BOMB_THRESHOLD)]
    bomb_threshold: usize,
}

impl Args {
    fn config(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig {
            destroy_threshold: self.destroy_threshold,
            bomb_threshold: self.bomb_threshold,
        }
        .validate()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let mut session = Session::new(&args.config().context("invalid thresholds")?);
    for (line_n, line) in io::stdin().lines().enumerate() {
        let line = line.context("couldn't read line from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command =
            parse_command(line).with_context(|| format!("couldn't parse line {}", line_n + 1))?;
        let output = session
            .execute(command)
            .with_context(|| format!("couldn't run line {}", line_n + 1))?;
        println!("{output}");
    }
    Ok(())
}

#[derive(Debug, Deserialize, Recap, PartialEq, Eq, Clone, Copy)]
#[recap(regex = r#"^board (?P<rows>\d+)x(?P<cols>\d+)$"#)]
struct RectangleCommand {
    rows: usize,
    cols: usize,
}

#[derive(Debug, Deserialize, Recap, PartialEq, Eq, Clone)]
#[recap(regex = r#"^board (?P<mask>[#.]+(?:/[#.]+)*)$"#)]
struct CustomCommand {
    mask: String,
}

#[derive(Debug, Deserialize, Recap, PartialEq, Eq, Clone, Copy)]
#[recap(
    regex = r#"^place (?P<color>\w+) (?P<face>\w+) (?P<degrees>\d+) (?P<row>\d+),(?P<col>\d+)$"#
)]
struct PlaceCommand {
    color: BlockColor,
    face: BlockFace,
    degrees: u16,
    row: usize,
    col: usize,
}

#[derive(Debug, Deserialize, Recap, PartialEq, Eq, Clone, Copy)]
#[recap(regex = r#"^(?:remove|infect) (?P<id>\d+)$"#)]
struct IdCommand {
    id: u32,
}

#[derive(Debug, Deserialize, Recap, PartialEq, Eq, Clone)]
#[recap(regex = r#"^check (?P<faces>\w+(?:,\w+)*)$"#)]
struct CheckCommand {
    faces: String,
}

#[derive(Debug, PartialEq, Eq, Clone)]
enum Command {
    Board(GridPreset),
    Place(PlaceCommand),
    Remove(BlockId),
    Infect(BlockId),
    Check(Vec<BlockFace>),
    Show,
}

fn parse_mask(mask: &str) -> anyhow::Result<ShapeMatrix> {
    Ok(ShapeMatrix::from_rows(
        mask.split('/').map(|row| row.chars().map(|cell| cell == '#')),
    )?)
}

fn parse_command(s: &str) -> anyhow::Result<Command> {
    let verb = s.split_whitespace().next().unwrap_or_default();
    Ok(match verb {
        "board" => match RectangleCommand::from_str(s) {
            Ok(RectangleCommand { rows, cols }) => {
                Command::Board(GridPreset::Rectangle { rows, cols })
            }
            Err(_) => {
                let mask = parse_mask(&CustomCommand::from_str(s)?.mask)?;
                Command::Board(GridPreset::Custom(mask))
            }
        },
        "place" => Command::Place(s.parse()?),
        "remove" => Command::Remove(IdCommand::from_str(s)?.id.into()),
        "infect" => Command::Infect(IdCommand::from_str(s)?.id.into()),
        "check" => Command::Check(
            CheckCommand::from_str(s)?
                .faces
                .split(',')
                .map(BlockFace::from_str)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        "show" if s == "show" => Command::Show,
        _ => bail!("unknown command {s:?}"),
    })
}

/// One board at a time, block ids handed out from 1.
struct Session {
    board: Option<Board>,
    engine: PlacementEngine,
    next_id: u32,
}

impl Session {
    fn new(config: &EngineConfig) -> Self {
        Self {
            board: None,
            engine: PlacementEngine::new(config),
            next_id: 1,
        }
    }

    fn board_mut(&mut self) -> anyhow::Result<&mut Board> {
        self.board.as_mut().context("no board yet, start with a `board` line")
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<String> {
        Ok(match command {
            Command::Board(preset) => {
                let board = Board::new(&preset)?;
                let line = format!("board {}x{}", board.rows(), board.cols());
                self.board = Some(board);
                line
            }
            Command::Place(place) => self.place(place)?,
            Command::Remove(id) => match self.board_mut()?.remove(id) {
                Some(_) => format!("{id} removed"),
                None => format!("{id} not on board"),
            },
            Command::Infect(id) => match infection::infect(self.board_mut()?, id) {
                true => format!("{id} infected"),
                false => format!("{id} not on board"),
            },
            Command::Check(faces) => {
                let candidates = faces
                    .into_iter()
                    .zip(0..)
                    .map(|(face, n)| Block::from_face(BlockId::new(n), BlockColor::Red, face))
                    .collect::<Result<Vec<_>, _>>()?;
                match availability::any_placeable(self.board_mut()?, &candidates) {
                    true => String::from("placeable"),
                    false => String::from("game over"),
                }
            }
            Command::Show => self.board_mut()?.to_string(),
        })
    }

    fn place(&mut self, command: PlaceCommand) -> anyhow::Result<String> {
        let PlaceCommand {
            color,
            face,
            degrees,
            row,
            col,
        } = command;
        let rotation = Rotation::try_from(degrees)?;
        let id = BlockId::new(self.next_id);
        self.next_id += 1;
        let block = Block::from_face(id, color, face)?;
        let engine = self.engine;
        let board = self.board_mut()?;
        let mut line = String::new();
        match engine.place(board, &block, rotation, Position::new(row, col)) {
            PlacementOutcome::Placed(Placement {
                matched,
                destroyed,
                fit_me,
                ..
            }) => {
                write!(line, "{id} placed")?;
                if let Some(tier) = matched.tier {
                    line.push_str(", destroyed");
                    for block in &destroyed {
                        write!(line, " {}", block.id)?;
                    }
                    write!(line, " ({tier})")?;
                }
                if fit_me {
                    line.push_str(", fit me");
                    board.clear();
                }
            }
            PlacementOutcome::Rejected(reason) => write!(line, "{id} rejected: {reason}")?,
        }
        Ok(line)
    }
}
