use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("wayfare"));
    cmd.env_remove("WAYFARE_API_URL")
        .env_remove("WAYFARE_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn top_level_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Search, filter and book flight itineraries from the terminal",
        ))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("locations"))
        .stdout(predicate::str::contains("bookings"))
        .stdout(predicate::str::contains("mcp"))
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("wayfare search -f BOS -t ORD"));
}

#[test]
fn top_level_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wayfare 0.1.0"));
}

#[test]
fn search_help_shows_all_options() {
    cmd()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-f, --from <LOCATION>"))
        .stdout(predicate::str::contains("-t, --to <LOCATION>"))
        .stdout(predicate::str::contains("-d, --date <YYYY-MM-DD>"))
        .stdout(predicate::str::contains("--return-date"))
        .stdout(predicate::str::contains("--max-layover <MIN>"))
        .stdout(predicate::str::contains("--client-layover"))
        .stdout(predicate::str::contains("--airlines <delta,southwest>"))
        .stdout(predicate::str::contains("--max-stops <N>"))
        .stdout(predicate::str::contains("--sort <KEY>"))
        .stdout(predicate::str::contains("--pick <N>"))
        .stdout(predicate::str::contains("--pick-return <N>"))
        .stdout(predicate::str::contains("--book"))
        .stdout(predicate::str::contains("--api-url <URL>"))
        .stdout(predicate::str::contains("--token <TOKEN>"))
        .stdout(predicate::str::contains("--proxy <URL>"))
        .stdout(predicate::str::contains("One-way:"))
        .stdout(predicate::str::contains("Round-trip:"));
}

#[test]
fn search_help_shows_defaults() {
    cmd()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: duration]"))
        .stdout(predicate::str::contains("[default: http://localhost:8080]"));
}

#[test]
fn search_requires_from_and_to() {
    cmd()
        .args(["search", "-t", "ORD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from"));
}

#[test]
fn invalid_airport_exits_2() {
    cmd()
        .args(["search", "-f", "Boston", "-t", "ORD"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid airport \"Boston\""));
}

#[test]
fn invalid_date_exits_2() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "-d", "2026-13-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn invalid_date_json_error() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "-d", "2026-02-30", "--json"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""kind":"invalid_date""#));
}

#[test]
fn return_before_departure_exits_2() {
    cmd()
        .args([
            "search", "-f", "BOS", "-t", "ORD", "-d", "2026-03-10", "--return-date", "2026-03-01",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("before departure date"));
}

#[test]
fn unknown_airline_exits_2() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "--airlines", "delta,united"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown airline: united"));
}

#[test]
fn unknown_sort_exits_2() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "--sort", "price"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid sort: price"));
}

#[test]
fn pick_return_needs_round_trip() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "--pick", "1", "--pick-return", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--pick-return requires --return-date"));
}

#[test]
fn pick_return_needs_pick() {
    cmd()
        .args([
            "search", "-f", "BOS", "-t", "ORD", "-d", "2026-03-01", "--return-date", "2026-03-08",
            "--pick-return", "1",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--pick-return requires --pick"));
}

#[test]
fn round_trip_booking_needs_pick_return() {
    cmd()
        .args([
            "search", "-f", "BOS", "-t", "ORD", "-d", "2026-03-01", "--return-date", "2026-03-08",
            "--pick", "1", "--book",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("round trip needs --pick-return before booking"));
}

#[test]
fn round_trip_booking_json_error_is_the_only_output() {
    let output = cmd()
        .args([
            "search", "-f", "BOS", "-t", "ORD", "-d", "2026-03-01", "--return-date", "2026-03-08",
            "--pick", "1", "--book", "--json",
        ])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    let doc: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(doc["error"]["kind"], "validation_error");
}

#[test]
fn pick_counts_from_one() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "--pick", "0"])
        .assert()
        .code(2);
}

#[test]
fn client_layover_needs_a_limit() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "--client-layover"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--client-layover requires --max-layover"));
}

#[test]
fn book_without_pick_is_incomplete() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "--book"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("no bookable itinerary selected"));
}

#[test]
fn book_without_pick_json_error() {
    cmd()
        .args(["search", "-f", "BOS", "-t", "ORD", "--book", "--json"])
        .assert()
        .code(7)
        .stdout(predicate::str::contains(r#""kind":"incomplete_selection""#));
}

#[test]
fn bookings_requires_user_id() {
    cmd()
        .arg("bookings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--user-id"));
}

#[test]
fn unreachable_proxy_exits_3() {
    cmd()
        .args([
            "search", "-f", "BOS", "-t", "ORD", "--proxy", "http://127.0.0.1:9", "--timeout", "5",
        ])
        .assert()
        .code(3);
}

#[test]
fn unreachable_service_exits_3() {
    cmd()
        .args([
            "search", "-f", "BOS", "-t", "ORD", "--api-url", "http://127.0.0.1:9", "--timeout", "5",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Failed to load flight data. Please try again later.",
        ));
}
