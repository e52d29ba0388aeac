#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use gamevault_cli::{Session, VaultConfig};

pub const PLAYERS: &str = "\
50,Ann,555-0001,ann@x.com,pw1,1,4.0,1,4.5,2,3.0
30,Bob,555-0002,bob@x.com,pw2,2,3.5,2,5.0
70,Cid,555-0003,cid@x.com,pw3,1,2.5
20,Dee,555-0004,dee@x.com,pw4,3,4.8,1,2.0,2,2.0,3,2.0
40,Eve,555-0005,eve@x.com,pw5,2,1.5
";

pub const GAMES: &str = "\
1,Chess,FIDE Labs,FIDE,4.8,12000
2,Go,Nihon Ki-in,Nihon Ki-in,4.9,8000
3,Tetris,Pajitnov,Elorg,4.7,50000
";

/// Data files and config in a scratch directory that lives as long as
/// the struct.
pub struct TestVault {
    pub dir: TempDir,
    pub config: VaultConfig,
}

impl TestVault {
    /// A vault seeded with the standard player and game fixtures.
    pub fn new() -> Self {
        Self::with_data(PLAYERS, GAMES)
    }

    pub fn with_data(players: impl AsRef<[u8]>, games: impl AsRef<[u8]>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let players_file = dir.path().join("Players.txt");
        let games_file = dir.path().join("Games.txt");
        std::fs::write(&players_file, players).unwrap();
        std::fs::write(&games_file, games).unwrap();
        let config = VaultConfig {
            players_file,
            games_file,
            output_file: dir.path().join("players_output.csv"),
            ..VaultConfig::default()
        };
        Self { dir, config }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn session(&self) -> Session {
        Session::load(self.config.clone()).unwrap()
    }
}

/// Feed `script` to a session and return everything it printed.
pub fn run_script(session: &mut Session, script: &str) -> String {
    let mut out = Vec::new();
    session.run(script.as_bytes(), &mut out, false).unwrap();
    String::from_utf8(out).unwrap()
}
