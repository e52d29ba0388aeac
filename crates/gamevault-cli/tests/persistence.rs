mod common;

use gamevault_cli::Session;
use gamevault_core::PlayerIndex;
use gamevault_core::codec::{format_player, load_players};

use common::{TestVault, run_script};

#[test]
fn save_writes_preorder_and_reloads_identically() {
    let vault = TestVault::new();
    let mut session = vault.session();
    let out = run_script(&mut session, "save\n");
    let output_file = vault.config.output_file.clone();
    assert_eq!(
        out,
        format!("Data saved to {} (5 players)\n", output_file.display())
    );

    let saved = std::fs::read_to_string(&output_file).unwrap();
    let order: Vec<&str> = saved
        .lines()
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(order, vec!["50", "30", "20", "40", "70"]);
    assert_eq!(saved.lines().next().unwrap(), "50,Ann,555-0001,ann@x.com,pw1,1,4");

    let mut reloaded = PlayerIndex::new();
    load_players(saved.as_bytes(), &mut reloaded).unwrap();
    let before: Vec<String> = session.players().inorder().map(format_player).collect();
    let after: Vec<String> = reloaded.inorder().map(format_player).collect();
    assert_eq!(before, after);
    // Played games are not persisted.
    assert_eq!(reloaded.get(50).unwrap().games_played_count(), 0);
}

#[test]
fn save_to_explicit_path_then_restart() {
    let vault = TestVault::new();
    let mut session = vault.session();
    let target = vault.path("backup.csv");
    run_script(
        &mut session,
        &format!("delete 30\nrename 20 Dee Dee\nsave {}\n", target.display()),
    );

    let mut config = vault.config.clone();
    config.players_file = target;
    let restarted = Session::load(config).unwrap();
    let ids: Vec<u64> = restarted.players().inorder().map(|p| p.id).collect();
    assert_eq!(ids, vec![20, 40, 50, 70]);
    assert_eq!(restarted.players().get(20).unwrap().display_name, "Dee Dee");
}

#[test]
fn save_failure_is_reported() {
    let vault = TestVault::new();
    let mut session = vault.session();
    let bad = vault.path("missing-dir/out.csv");
    let out = run_script(&mut session, &format!("save {}\nfind-player 50\n", bad.display()));
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("Error: i/o error"));
    assert_eq!(lines[1], "Player found: Ann");
}

#[test]
fn export_writes_json_snapshot() {
    let vault = TestVault::new();
    let mut session = vault.session();
    let target = vault.path("snapshot.json");
    let out = run_script(&mut session, &format!("export {}\n", target.display()));
    assert!(out.starts_with("Exported 5 players and 3 games"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    let players = json["players"].as_array().unwrap();
    assert_eq!(players.len(), 5);
    assert_eq!(players[0]["id"], 20);
    assert_eq!(players[0]["games_played"].as_array().unwrap().len(), 3);
    assert_eq!(json["games"][2]["name"], "Tetris");
}

#[test]
fn malformed_lines_are_skipped_on_startup() {
    let players = "\
50,Ann,555-0001,ann@x.com,pw1,1,4.0
oops
30,Bob,555-0002
70,Cid,555-0003,cid@x.com,pw3,one,2.5
40,Eve,555-0005,eve@x.com,pw5,2,1.5
";
    let vault = TestVault::with_data(players, common::GAMES);
    let session = vault.session();
    let ids: Vec<u64> = session.players().inorder().map(|p| p.id).collect();
    assert_eq!(ids, vec![40, 50]);
}

#[test]
fn undecodable_data_line_is_skipped_on_startup() {
    let mut players = b"50,Ann,555-0001,ann@x.com,pw1,1,4.0\n".to_vec();
    players.extend_from_slice(b"60,Z\xff\xfe,555-0006,z@x.com,pw6,1,3.0\n");
    players.extend_from_slice(b"70,Cid,555-0003,cid@x.com,pw3,1,2.5\n");
    let vault = TestVault::with_data(players, common::GAMES);
    let session = Session::load(vault.config.clone()).unwrap();
    let ids: Vec<u64> = session.players().inorder().map(|p| p.id).collect();
    assert_eq!(ids, vec![50, 70]);
}
