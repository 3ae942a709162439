use assert_cmd::Command;
use predicates::prelude::*;

/// Tuesday, January 14, 2025, 10:15 in New York.
const TUESDAY_MORNING: &str = "2025-01-14T10:15:00-05:00";
/// Shabbat afternoon, between candle-lighting and havdalah.
const SHABBAT_AFTERNOON: &str = "2025-01-18T12:00:00-05:00";

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn minyan_times() -> Command {
    let mut cmd = Command::cargo_bin("minyan-times").unwrap();
    cmd.env_remove("MINYAN_TIMES_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// ── parse ─────────────────────────────────────────────────────────────────

#[test]
fn test_parse_week_of_monday() {
    let json = json_stdout(
        minyan_times().args(["--now", TUESDAY_MORNING, "parse", "week", "of", "monday"]),
    );
    assert_eq!(json["start"], "2025-01-19T00:00:00-05:00");
    assert_eq!(json["end"], "2025-01-25T23:59:59-05:00");
    assert_eq!(json["header"], "Minyan times for the week of 1/20/25");
    assert_eq!(json["include_elapsed"], true);
}

#[test]
fn test_parse_friday_to_monday() {
    let json = json_stdout(minyan_times().args([
        "--now",
        TUESDAY_MORNING,
        "parse",
        "!times Friday to Monday",
    ]));
    assert_eq!(json["start"], "2025-01-17T00:00:00-05:00");
    assert_eq!(json["end"], "2025-01-20T23:59:59-05:00");
}

#[test]
fn test_parse_upcoming_default() {
    let json = json_stdout(minyan_times().args(["--now", TUESDAY_MORNING, "parse", "!times"]));
    assert_eq!(json["start"], "2025-01-14T10:15:00-05:00");
    assert_eq!(json["end"], "2025-01-15T11:15:00-05:00");
    assert_eq!(json["include_elapsed"], false);
}

#[test]
fn test_parse_alternate_locale() {
    let json = json_stdout(minyan_times().args([
        "--now",
        TUESDAY_MORNING,
        "parse",
        "sephardic",
        "tomorrow",
    ]));
    assert_eq!(json["alternate_locale"], true);
    assert_eq!(json["header"], "Minyan times for tomorrow");
}

#[test]
fn test_parse_help() {
    minyan_times()
        .args(["parse", "!help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("*Usage:*"));
}

#[test]
fn test_parse_invalid_date_fails() {
    minyan_times()
        .args(["--now", TUESDAY_MORNING, "parse", "2/30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not understand that date"))
        .stderr(predicate::str::contains("Invalid date: 2/30/2025"));
}

#[test]
fn test_parse_gibberish_fails() {
    minyan_times()
        .args(["--now", TUESDAY_MORNING, "parse", "next", "blursday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not understand that date"));
}

#[test]
fn test_parse_other_zone() {
    let json = json_stdout(minyan_times().args([
        "--tz",
        "America/Los_Angeles",
        "--now",
        TUESDAY_MORNING,
        "parse",
        "today",
    ]));
    assert_eq!(json["start"], "2025-01-14T00:00:00-08:00");
}

#[test]
fn test_unknown_zone_fails() {
    minyan_times()
        .args(["--tz", "Mars/Olympus_Mons", "parse", "today"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown time zone"));
}

#[test]
fn test_bad_now_fails() {
    minyan_times()
        .args(["--now", "tuesday", "parse", "today"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}

// ── times ─────────────────────────────────────────────────────────────────

#[test]
fn test_times_today_lists_elapsed() {
    minyan_times()
        .args(["--now", TUESDAY_MORNING, "times", "today"])
        .arg("--events")
        .arg(fixture("events.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "*Minyan times for today:*\nTuesday, January 14th\n- *Shacharis*: 7:00\u{202F}ᴀᴍ\n",
        ))
        .stdout(predicate::str::contains("- *Mincha*: 4:30\u{202F}ᴘᴍ"))
        .stdout(predicate::str::contains("Daf Yomi").not());
}

#[test]
fn test_times_upcoming_hides_elapsed() {
    let json = json_stdout(
        minyan_times()
            .args(["--now", TUESDAY_MORNING, "times", "--json"])
            .arg("--events")
            .arg(fixture("events.json")),
    );
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Mincha", "Maariv", "Shacharis"]);
    assert_eq!(json[2]["start"], "2025-01-15T07:00:00-05:00");
}

#[test]
fn test_times_alternate_locale_names() {
    minyan_times()
        .args(["--now", TUESDAY_MORNING, "times", "sephardic", "tomorrow"])
        .arg("--events")
        .arg(fixture("events.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("*Shaharit*"))
        .stdout(predicate::str::contains("*Minha*"))
        .stdout(predicate::str::contains("Shacharis").not());
}

#[test]
fn test_times_empty_day() {
    minyan_times()
        .args(["--now", TUESDAY_MORNING, "times", "1/16"])
        .arg("--events")
        .arg(fixture("events.json"))
        .assert()
        .success()
        .stdout("*Minyan times for Thursday, January 16th:*\nThursday, January 16th\n(no times to show)\n");
}

#[test]
fn test_times_config_selects_calendar() {
    minyan_times()
        .arg("--config")
        .arg(fixture("shiur.toml"))
        .args(["--now", TUESDAY_MORNING, "times", "today"])
        .arg("--events")
        .arg(fixture("events.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("- *Daf Yomi*: 9:00\u{202F}ᴘᴍ"));
}

#[test]
fn test_times_rejects_negative_grace() {
    minyan_times()
        .arg("--config")
        .arg(fixture("negative_grace.toml"))
        .args(["--now", TUESDAY_MORNING, "times"])
        .arg("--events")
        .arg(fixture("events.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("elapsed_grace_minutes must be between 0 and 1440"));
}

#[test]
fn test_times_missing_events_file() {
    minyan_times()
        .args(["--now", TUESDAY_MORNING, "times", "today"])
        .args(["--events", "/nonexistent/events.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "There was an error retrieving the minyan times",
        ));
}

// ── yomtov / digest ───────────────────────────────────────────────────────

#[test]
fn test_yomtov_upcoming() {
    let json = json_stdout(
        minyan_times()
            .args(["--now", TUESDAY_MORNING, "yomtov"])
            .arg("--events")
            .arg(fixture("liturgical.json")),
    );
    assert_eq!(json["open"], "2025-01-17T16:40:00-05:00");
    assert_eq!(json["close"], "2025-01-18T17:45:00-05:00");
    assert_eq!(json["in_progress"], false);
}

#[test]
fn test_yomtov_in_progress() {
    let json = json_stdout(
        minyan_times()
            .args(["--now", SHABBAT_AFTERNOON, "yomtov"])
            .arg("--events")
            .arg(fixture("liturgical.json")),
    );
    assert_eq!(json["in_progress"], true);
}

#[test]
fn test_digest_sends_upcoming_times() {
    minyan_times()
        .args(["--now", TUESDAY_MORNING, "digest"])
        .arg("--events")
        .arg(fixture("events.json"))
        .arg("--liturgical")
        .arg(fixture("liturgical.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "*Upcoming minyan times:*\n\nTuesday, January 14th\n- *Mincha*",
        ))
        .stdout(predicate::str::contains("Wednesday, January 15th"));
}

#[test]
fn test_digest_skipped_on_shabbat() {
    minyan_times()
        .args(["--now", SHABBAT_AFTERNOON, "digest"])
        .arg("--events")
        .arg(fixture("events.json"))
        .arg("--liturgical")
        .arg(fixture("liturgical.json"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Digest skipped"));
}
