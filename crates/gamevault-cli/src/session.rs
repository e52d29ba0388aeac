use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use gamevault_core::codec::{load_games_from_path, load_players_from_path};
use gamevault_core::{Game, GameCatalog, LedgerError, Player, PlayerIndex};

use crate::command::{self, Command, CommandError, HELP};
use crate::config::VaultConfig;

/// Whether the read/eval loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Exclusive owner of the player index and game catalog for one run.
pub struct Session {
    players: PlayerIndex,
    games: GameCatalog,
    config: VaultConfig,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    players: Vec<&'a Player>,
    games: &'a [Game],
}

impl Session {
    /// An empty session.
    pub fn new(config: VaultConfig) -> Self {
        Self {
            players: PlayerIndex::new(),
            games: GameCatalog::with_capacity(config.catalog_capacity),
            config,
        }
    }

    /// A session seeded from the configured data files.
    pub fn load(config: VaultConfig) -> Result<Self, LedgerError> {
        let mut session = Self::new(config);
        load_players_from_path(&session.config.players_file, &mut session.players)?;
        load_games_from_path(&session.config.games_file, &mut session.games)?;
        Ok(session)
    }

    pub fn players(&self) -> &PlayerIndex {
        &self.players
    }

    pub fn games(&self) -> &GameCatalog {
        &self.games
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Read commands from `input` until it ends or a quit command arrives.
    /// Command failures are reported on `out` and never end the loop.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
        interactive: bool,
    ) -> io::Result<()> {
        if interactive {
            writeln!(out, "gamevault: type \"help\" for commands")?;
            write!(out, "> ")?;
            out.flush()?;
        }
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let outcome = match std::str::from_utf8(&buf) {
                Ok(line) => self.dispatch(line, out),
                Err(_) => Err("input is not valid UTF-8".to_string()),
            };
            match outcome {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {},
                Err(message) => {
                    let input = String::from_utf8_lossy(&buf);
                    tracing::debug!(input = %input.trim_end(), %message, "command failed");
                    writeln!(out, "Error: {message}")?;
                },
            }
            if interactive {
                write!(out, "> ")?;
                out.flush()?;
            }
        }
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, String> {
        match command::parse(line) {
            Ok(cmd) => self.execute(cmd, out).map_err(|e| e.to_string()),
            Err(CommandError::Empty) => Ok(Flow::Continue),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Carry out one command, writing its user-facing output to `out`.
    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> Result<Flow, LedgerError> {
        match cmd {
            Command::ListGames => {
                if self.games.is_empty() {
                    writeln!(out, "No games.")?;
                }
                for g in self.games.list_all() {
                    writeln!(
                        out,
                        "Game ID: {}, Name: {}, Developer: {}, Publisher: {}, Rating: {}, Downloads: {}",
                        g.id, g.name, g.developer, g.publisher, g.rating, g.downloads
                    )?;
                }
            },
            Command::ShowPlayers => self.write_layers(self.config.display_layers, out)?,
            Command::AddPlayer(player) => {
                self.players.insert(player)?;
                writeln!(out, "Player added successfully!")?;
            },
            Command::AddGame(game) => {
                self.games.add(game)?;
                writeln!(out, "Game added successfully!")?;
            },
            Command::FindPlayer(id) => {
                let player = self
                    .players
                    .get(id)
                    .ok_or_else(|| LedgerError::player_not_found(id))?;
                writeln!(out, "Player found: {}", player.display_name)?;
            },
            Command::FindGame(id) => {
                let game = self
                    .games
                    .find(id)
                    .ok_or_else(|| LedgerError::game_not_found(id))?;
                writeln!(out, "Game found: {}", game.name)?;
            },
            Command::DeletePlayer(id) => {
                self.players
                    .remove(id)
                    .ok_or_else(|| LedgerError::player_not_found(id))?;
                writeln!(out, "Player deleted.")?;
            },
            Command::Save(path) => {
                let path = path.unwrap_or_else(|| self.config.output_file.clone());
                let written = self.players.save_to_path(&path)?;
                writeln!(out, "Data saved to {} ({written} players)", path.display())?;
            },
            Command::Layers(n) => self.write_layers(n, out)?,
            Command::Depth(id) => {
                let depth = self
                    .players
                    .depth_of(id)
                    .ok_or_else(|| LedgerError::player_not_found(id))?;
                writeln!(out, "Player is at layer {depth}")?;
            },
            Command::Path(id) => {
                let path = self
                    .players
                    .path_to(id)
                    .ok_or_else(|| LedgerError::player_not_found(id))?;
                writeln!(out, "Path to player: {}", join_ids(&path))?;
            },
            Command::Descent(id) => {
                let path = self
                    .players
                    .descent_path(id)
                    .ok_or_else(|| LedgerError::player_not_found(id))?;
                writeln!(out, "Search path to player: {}", join_ids(&path))?;
            },
            Command::Rename { id, name } => {
                self.players.rename(id, &name)?;
                writeln!(out, "Player details updated.")?;
            },
            Command::Top(n) => {
                writeln!(out, "Top {n} players by id:")?;
                for p in self.players.top_n(n) {
                    write_ranked(p, out)?;
                }
            },
            Command::Active(n) => {
                writeln!(out, "Top {n} players by games played:")?;
                for p in self.players.most_active(n) {
                    write_ranked(p, out)?;
                }
            },
            Command::Show(id) => {
                let p = self
                    .players
                    .get(id)
                    .ok_or_else(|| LedgerError::player_not_found(id))?;
                writeln!(
                    out,
                    "Player Details: {}, Email: {}, Phone: {}, Primary Game: {}, Rating: {}",
                    p.display_name, p.email, p.phone, p.primary_game, p.rating
                )?;
                writeln!(out, "Games Played:")?;
                for g in p.games_played() {
                    writeln!(out, "  Game ID: {}, Rating: {}", g.game_id, g.rating)?;
                }
            },
            Command::HasPlayed { player, game } => {
                if self.players.has_played(player, game)? {
                    writeln!(out, "Player has played this game.")?;
                } else {
                    writeln!(out, "Player has not played this game.")?;
                }
            },
            Command::Export(path) => {
                self.export_json(&path)?;
                writeln!(
                    out,
                    "Exported {} players and {} games to {}",
                    self.players.len(),
                    self.games.len(),
                    path.display()
                )?;
            },
            Command::Help => {
                for line in HELP {
                    writeln!(out, "{line}")?;
                }
            },
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Write players in ascending id order with their played games, plus
    /// every game, as pretty-printed JSON.
    pub fn export_json(&self, path: &Path) -> Result<(), LedgerError> {
        let snapshot = Snapshot {
            players: self.players.inorder().collect(),
            games: self.games.list_all(),
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &snapshot).map_err(io::Error::from)?;
        writer.flush()?;
        tracing::info!(path = %path.display(), players = snapshot.players.len(), "snapshot exported");
        Ok(())
    }

    fn write_layers<W: Write>(&self, max_depth: usize, out: &mut W) -> Result<(), LedgerError> {
        if self.players.is_empty() {
            writeln!(out, "No players.")?;
        }
        for visit in self.players.layers(max_depth) {
            writeln!(
                out,
                "{:indent$}Player ID: {}, Name: {}",
                "",
                visit.player.id,
                visit.player.display_name,
                indent = (visit.depth - 1) * 2
            )?;
        }
        Ok(())
    }
}

fn write_ranked<W: Write>(p: &Player, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "Player ID: {}, Name: {}, Games Played: {}",
        p.id,
        p.display_name,
        p.games_played_count()
    )
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
