//! Comma-delimited record lines.
//!
//! Player line: `id,name,phone,email,password,primary_game,rating[,game_id,game_rating]*`
//! Game line:   `id,name,developer,publisher,rating,downloads`
//!
//! Empty fields between consecutive commas are skipped, so `a,,b` reads as
//! two fields. Numbers are parsed strictly: a line whose numeric field does
//! not parse is reported as malformed rather than read as garbage.
//! Loading never aborts on a bad line. Malformed lines, including ones that
//! are not valid UTF-8, are skipped and counted. Records the container
//! refuses are counted separately as rejected.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::catalog::GameCatalog;
use crate::error::LedgerError;
use crate::game::Game;
use crate::index::PlayerIndex;
use crate::player::Player;

/// Outcome counts of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records stored.
    pub loaded: usize,
    /// Lines that could not be read as a record.
    pub skipped: usize,
    /// Well-formed records the container refused (duplicate id, full, too long).
    pub rejected: usize,
}

struct Fields<'a> {
    tokens: std::iter::Filter<std::str::Split<'a, char>, fn(&&str) -> bool>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        let not_empty: fn(&&str) -> bool = |t| !t.is_empty();
        Self {
            tokens: text
                .trim_end_matches(['\r', '\n'])
                .split(',')
                .filter(not_empty),
            line,
        }
    }

    fn text(&mut self, name: &str) -> Result<&'a str, LedgerError> {
        self.tokens
            .next()
            .ok_or_else(|| LedgerError::malformed(self.line, format!("missing {name}")))
    }

    fn id(&mut self, name: &str) -> Result<u64, LedgerError> {
        let raw = self.text(name)?;
        parse_id(raw, name, self.line)
    }

    fn rating(&mut self, name: &str) -> Result<f64, LedgerError> {
        let raw = self.text(name)?;
        parse_rating(raw, name, self.line)
    }

    fn count(&mut self, name: &str) -> Result<u32, LedgerError> {
        let raw = self.text(name)?;
        raw.trim().parse().map_err(|_| {
            LedgerError::malformed(self.line, format!("{name} {raw:?} is not a count"))
        })
    }
}

fn parse_id(raw: &str, name: &str, line: usize) -> Result<u64, LedgerError> {
    raw.trim().parse().map_err(|_| {
        LedgerError::malformed(line, format!("{name} {raw:?} is not an unsigned integer"))
    })
}

fn parse_rating(raw: &str, name: &str, line: usize) -> Result<f64, LedgerError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LedgerError::malformed(
            line,
            format!("{name} {raw:?} is not a number"),
        )),
    }
}

/// Parse one player line. `line` is the 1-based source line used in errors.
///
/// Trailing `game_id,rating` pairs fill the played-games list; pairs beyond
/// its capacity are read and discarded, and a trailing id without a rating
/// is ignored.
pub fn parse_player_line(text: &str, line: usize) -> Result<Player, LedgerError> {
    let mut fields = Fields::new(text, line);
    let id = fields.id("player id")?;
    let name = fields.text("name")?;
    let phone = fields.text("phone")?;
    let email = fields.text("email")?;
    let password = fields.text("password")?;
    let primary_game = fields.id("primary game id")?;
    let rating = fields.rating("rating")?;
    let mut player = Player::new(id, name, phone, email, password, primary_game, rating);

    let mut dropped = 0usize;
    while let Some(raw_game) = fields.tokens.next() {
        let Some(raw_rating) = fields.tokens.next() else {
            break;
        };
        let game_id = parse_id(raw_game, "game id", line)?;
        let game_rating = parse_rating(raw_rating, "game rating", line)?;
        if player.add_game(game_id, game_rating).is_err() {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(player_id = id, dropped, "played-games list full, pairs discarded");
    }
    Ok(player)
}

pub fn parse_game_line(text: &str, line: usize) -> Result<Game, LedgerError> {
    let mut fields = Fields::new(text, line);
    Ok(Game::new(
        fields.id("game id")?,
        fields.text("name")?,
        fields.text("developer")?,
        fields.text("publisher")?,
        fields.rating("rating")?,
        fields.count("downloads")?,
    ))
}

/// The persisted layout of a player. Played games are not included.
pub fn format_player(p: &Player) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        p.id, p.display_name, p.phone, p.email, p.password, p.primary_game, p.rating
    )
}

pub fn format_game(g: &Game) -> String {
    format!(
        "{},{},{},{},{},{}",
        g.id, g.name, g.developer, g.publisher, g.rating, g.downloads
    )
}

fn load_lines<R, T>(
    mut reader: R,
    parse: impl Fn(&str, usize) -> Result<T, LedgerError>,
    mut store: impl FnMut(T) -> Result<(), LedgerError>,
) -> Result<LoadReport, LedgerError>
where
    R: BufRead,
{
    let mut report = LoadReport::default();
    let mut buf = Vec::new();
    let mut line = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line += 1;
        let Ok(text) = std::str::from_utf8(&buf) else {
            tracing::warn!(line, "skipping line that is not valid UTF-8");
            report.skipped += 1;
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        match parse(text, line).and_then(&mut store) {
            Ok(()) => report.loaded += 1,
            Err(e) if e.is_rejection() => {
                tracing::warn!(line, error = %e, "record rejected");
                report.rejected += 1;
            },
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping malformed record");
                report.skipped += 1;
            },
        }
    }
    Ok(report)
}

/// Read player lines into `index`.
pub fn load_players<R: BufRead>(
    reader: R,
    index: &mut PlayerIndex,
) -> Result<LoadReport, LedgerError> {
    load_lines(reader, parse_player_line, |p| index.insert(p))
}

/// Read game lines into `catalog`.
pub fn load_games<R: BufRead>(
    reader: R,
    catalog: &mut GameCatalog,
) -> Result<LoadReport, LedgerError> {
    load_lines(reader, parse_game_line, |g| catalog.add(g))
}

/// Open `path` for reading; a missing file is not an error.
fn open_optional(path: &Path) -> Result<Option<BufReader<File>>, LedgerError> {
    match File::open(path) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "data file not found, starting empty");
            Ok(None)
        },
        Err(e) => Err(e.into()),
    }
}

pub fn load_players_from_path(
    path: impl AsRef<Path>,
    index: &mut PlayerIndex,
) -> Result<LoadReport, LedgerError> {
    let path = path.as_ref();
    let Some(reader) = open_optional(path)? else {
        return Ok(LoadReport::default());
    };
    let report = load_players(reader, index)?;
    tracing::info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        rejected = report.rejected,
        "players loaded"
    );
    Ok(report)
}

pub fn load_games_from_path(
    path: impl AsRef<Path>,
    catalog: &mut GameCatalog,
) -> Result<LoadReport, LedgerError> {
    let path = path.as_ref();
    let Some(reader) = open_optional(path)? else {
        return Ok(LoadReport::default());
    };
    let report = load_games(reader, catalog)?;
    tracing::info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        rejected = report.rejected,
        "games loaded"
    );
    Ok(report)
}
