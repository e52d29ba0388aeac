use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use gamevault_core::codec::{parse_game_line, parse_player_line};
use gamevault_core::{Game, GameId, LedgerError, Player, PlayerId};

/// One line of user input, decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ListGames,
    ShowPlayers,
    AddPlayer(Player),
    AddGame(Game),
    FindPlayer(PlayerId),
    FindGame(GameId),
    DeletePlayer(PlayerId),
    Save(Option<PathBuf>),
    Layers(usize),
    Depth(PlayerId),
    Path(PlayerId),
    Descent(PlayerId),
    Rename { id: PlayerId, name: String },
    Top(usize),
    Active(usize),
    Show(PlayerId),
    HasPlayed { player: PlayerId, game: GameId },
    Export(PathBuf),
    Help,
    Quit,
}

#[derive(Debug)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    InvalidArgument {
        command: &'static str,
        value: String,
    },
    Record(LedgerError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(word) => write!(f, "unknown command {word:?}, try \"help\""),
            Self::MissingArgument { command, what } => write!(f, "{command}: missing {what}"),
            Self::InvalidArgument { command, value } => {
                write!(f, "{command}: invalid argument {value:?}")
            },
            Self::Record(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Usage lines printed by `help`, in menu order.
pub const HELP: &[&str] = &[
    " 1  games                      display all games",
    " 2  players                    display players (configured layers)",
    " 3  add-player <record>        insert a player: id,name,phone,email,password,game,rating[,game,rating]*",
    " 4  add-game <record>          insert a game: id,name,developer,publisher,rating,downloads",
    " 5  find-player <id>           search player",
    " 6  find-game <id>             search game",
    " 7  delete <id>                delete player",
    " 8  save [path]                save players to file",
    " 9  layers <n>                 show n layers of the tree",
    "10  depth <id>                 show layer number of player",
    "11  path <id>                  show traversal path to player",
    "    descent <id>               show search path to player",
    "12  rename <id> <name>         edit player name",
    "13  top <n>                    top n players by id",
    "    active <n>                 top n players by games played",
    "14  show <id>                  show player details",
    "15  has-played <id> <game>     check if player has played a game",
    "    export <path>              write a JSON snapshot",
    "    help                       show this list",
    " 0  quit                       exit",
];

struct Args<'a> {
    command: &'static str,
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn next_word(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            return None;
        }
        let (word, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        self.rest = tail;
        Some(word)
    }

    fn number<T: FromStr>(&mut self, what: &'static str) -> Result<T, CommandError> {
        let word = self.next_word().ok_or(CommandError::MissingArgument {
            command: self.command,
            what,
        })?;
        word.parse().map_err(|_| CommandError::InvalidArgument {
            command: self.command,
            value: word.to_string(),
        })
    }

    /// Everything left on the line, trimmed.
    fn remainder(&mut self, what: &'static str) -> Result<&'a str, CommandError> {
        let rest = std::mem::take(&mut self.rest).trim();
        if rest.is_empty() {
            return Err(CommandError::MissingArgument {
                command: self.command,
                what,
            });
        }
        Ok(rest)
    }
}

/// Decode a command line. The first word is either a menu number or a
/// command name; names are case-insensitive.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let word = word.to_ascii_lowercase();
    let args = |command: &'static str| Args { command, rest };

    let cmd = match word.as_str() {
        "" => return Err(CommandError::Empty),
        "1" | "games" => Command::ListGames,
        "2" | "players" => Command::ShowPlayers,
        "3" | "add-player" => {
            let record = args("add-player").remainder("player record")?;
            Command::AddPlayer(parse_player_line(record, 0).map_err(CommandError::Record)?)
        },
        "4" | "add-game" => {
            let record = args("add-game").remainder("game record")?;
            Command::AddGame(parse_game_line(record, 0).map_err(CommandError::Record)?)
        },
        "5" | "find-player" => Command::FindPlayer(args("find-player").number("player id")?),
        "6" | "find-game" => Command::FindGame(args("find-game").number("game id")?),
        "7" | "delete" => Command::DeletePlayer(args("delete").number("player id")?),
        "8" | "save" => {
            let path = args("save").remainder("path").ok().map(PathBuf::from);
            Command::Save(path)
        },
        "9" | "layers" => Command::Layers(args("layers").number("layer count")?),
        "10" | "depth" => Command::Depth(args("depth").number("player id")?),
        "11" | "path" => Command::Path(args("path").number("player id")?),
        "descent" => Command::Descent(args("descent").number("player id")?),
        "12" | "rename" => {
            let mut a = args("rename");
            let id = a.number("player id")?;
            let name = a.remainder("new name")?.to_string();
            Command::Rename { id, name }
        },
        "13" | "top" => Command::Top(args("top").number("count")?),
        "active" => Command::Active(args("active").number("count")?),
        "14" | "show" => Command::Show(args("show").number("player id")?),
        "15" | "has-played" => {
            let mut a = args("has-played");
            let player = a.number("player id")?;
            let game = a.number("game id")?;
            Command::HasPlayed { player, game }
        },
        "export" => Command::Export(PathBuf::from(args("export").remainder("path")?)),
        "help" | "?" => Command::Help,
        "0" | "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(cmd)
}
