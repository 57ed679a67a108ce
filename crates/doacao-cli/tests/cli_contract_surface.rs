// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;

const MATEUS_CODE: &str = "00020126400014br.gov.bcb.pix0118mateus@doacoes.org5918Campanha do Mateus6009São Paulo540525.000532abcdef0123456789abcdef01234567895802BR520852040000530398662240520Doação para o Mateus6304B7FE";

fn doacao() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_doacao"));
    cmd.env_remove("DOACAO_LOG_LEVEL");
    cmd
}

fn parse_commands_from_help(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut in_commands = false;
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed == "Commands:" {
            in_commands = true;
            continue;
        }
        if in_commands {
            if trimmed.is_empty() {
                break;
            }
            let name = trimmed.split_whitespace().next().unwrap_or("");
            if !name.is_empty() && name != "help" {
                commands.push(name.to_string());
            }
        }
    }
    commands.sort();
    commands
}

#[test]
fn help_command_surface_is_stable() {
    let output = doacao().arg("--help").output().expect("run help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 help");
    let expected = include_str!("snapshots/help.commands.txt")
        .lines()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(parse_commands_from_help(&text), expected);
}

#[test]
fn version_output_contains_crate_version() {
    doacao()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_returns_usage_exit_code_with_machine_error() {
    doacao()
        .args(["--json", "--unknown-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("usage_error"));
}

#[test]
fn missing_command_is_a_usage_error() {
    doacao().assert().code(2);
}

#[test]
fn pix_build_reproduces_reference_code() {
    doacao()
        .args([
            "pix",
            "build",
            "--key",
            "mateus@doacoes.org",
            "--name",
            "Campanha do Mateus",
            "--city",
            "São Paulo",
            "--amount",
            "25.00",
            "--description",
            "Doação para o Mateus",
            "--txid",
            "abcdef0123456789abcdef0123456789",
        ])
        .assert()
        .success()
        .stdout(format!("{MATEUS_CODE}\n"));
}

#[test]
fn pix_build_json_generates_a_payment_id_and_qr() {
    let output = doacao()
        .args([
            "--json",
            "pix",
            "build",
            "--key",
            "k@x.org",
            "--name",
            "N",
            "--city",
            "C",
            "--amount",
            "10",
            "--description",
            "d",
            "--qr",
        ])
        .output()
        .expect("run build");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let payment_id = payload["paymentId"].as_str().expect("payment id");
    assert_eq!(payment_id.len(), 32);
    assert!(payment_id.chars().all(|c| c.is_ascii_hexdigit()));
    let code = payload["qrCodeText"].as_str().expect("code");
    assert!(code.contains("540510.00"));
    assert!(payload["qrCodeImage"]
        .as_str()
        .expect("qr image")
        .starts_with("data:image/svg+xml;base64,"));
}

#[test]
fn pix_build_rejects_bad_amount() {
    doacao()
        .args([
            "--json", "pix", "build", "--key", "k", "--name", "N", "--city", "C", "--amount",
            "abc", "--description", "d",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"code\":\"validation\""));
}

#[test]
fn pix_verify_accepts_reference_and_rejects_tampered_code() {
    doacao()
        .args(["pix", "verify", MATEUS_CODE])
        .assert()
        .success()
        .stdout(predicate::str::contains("checksum: OK"));
    let tampered = MATEUS_CODE.replace("25.00", "26.00");
    doacao().args(["pix", "verify", &tampered]).assert().code(3);
}

#[test]
fn pix_inspect_lists_nested_fields() {
    let output = doacao()
        .args(["--json", "pix", "inspect", MATEUS_CODE])
        .output()
        .expect("run inspect");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["checksumValid"], true);
    let fields = payload["fields"].as_array().expect("fields");
    let account = fields
        .iter()
        .find(|f| f["tag"] == "26")
        .expect("account template");
    assert_eq!(account["fields"][0]["value"], "br.gov.bcb.pix");
    assert_eq!(account["fields"][1]["value"], "mateus@doacoes.org");
}

#[test]
fn pix_watch_rejects_malformed_expiry() {
    doacao()
        .args([
            "pix",
            "watch",
            "--status-url",
            "http://127.0.0.1:9",
            "--payment-id",
            "abcdef0123456789abcdef0123456789",
            "--expires-at",
            "tomorrow",
        ])
        .assert()
        .code(3);
}

#[test]
fn pix_watch_reports_expired_instruction() {
    doacao()
        .args([
            "--json",
            "pix",
            "watch",
            "--status-url",
            "http://127.0.0.1:9",
            "--payment-id",
            "abcdef0123456789abcdef0123456789",
            "--expires-at",
            "2020-01-01T00:00:00Z",
        ])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"expired\""));
}

#[test]
fn campaign_assign_is_deterministic() {
    doacao()
        .args(["campaign", "assign", "127.0.0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pedro-campaign"));
    doacao()
        .args(["campaign", "assign", "::1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ana-campaign"));
}

#[test]
fn campaign_show_unknown_slug_is_not_found() {
    doacao()
        .args(["--json", "campaign", "show", "nao-existe"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not_found"));
}

#[test]
fn campaign_list_reads_custom_catalog() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("catalog.json");
    let catalog = serde_json::json!([{
        "id": "solo-campaign",
        "slug": "/",
        "title": "Campanha solo",
        "bannerImage": "b.png",
        "contentImage": "c.png",
        "description": "d",
        "patientName": "P",
        "patientAge": 3,
        "condition": "c",
        "location": "l",
        "raised": 10,
        "goal": 100,
        "donorsCount": 1,
        "daysRemaining": 5,
        "story": ["s"],
        "destinationList": ["x"]
    }]);
    std::fs::write(&path, catalog.to_string()).expect("write catalog");

    let output = doacao()
        .args(["--json", "campaign", "--catalog"])
        .arg(&path)
        .arg("list")
        .output()
        .expect("run list");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let campaigns = payload["campaigns"].as_array().expect("campaigns");
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0]["id"], "solo-campaign");
}

#[test]
fn campaign_list_with_missing_catalog_fails() {
    doacao()
        .args(["campaign", "--catalog", "/nonexistent/catalog.json", "list"])
        .assert()
        .failure();
}
