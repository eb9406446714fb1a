use assert_cmd::Command;
use predicates::prelude::*;
use std::{
    error::Error,
    fs,
    io::{Read, Write},
    net::TcpListener,
    path::{Path, PathBuf},
    process,
    thread::{self, JoinHandle},
};

fn scratch_store(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tonnage-cli-{}-{name}.json", process::id()));
    let _ = fs::remove_file(&path);
    path
}

fn tonnage() -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("tonnage")?;
    cmd.env_remove("RUST_LOG");
    for proxy in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(proxy);
    }
    Ok(cmd)
}

/// Lookup of Bronx PAPER district 9 against a dataset served from `domain`.
fn lookup_against(domain: &str, store: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = tonnage()?;
    cmd.env("TONNAGE_SOCRATA__DOMAIN", domain)
        .env("TONNAGE_SOCRATA__TIMEOUT_SECS", "10")
        .args(["-b", "bronx", "-t", "paper", "-d", "9"])
        .arg("--store")
        .arg(store);
    Ok(cmd)
}

/// Answer a single HTTP request with `body` as JSON.
fn serve_once(body: &'static str) -> Result<(String, JoinHandle<()>), Box<dyn Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let domain = format!("http://{}", listener.local_addr()?);

    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(read) => request.extend_from_slice(&buf[..read]),
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    Ok((domain, handle))
}

fn stored_districts(store: &Path) -> Result<serde_json::Value, Box<dyn Error>> {
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(store)?)?;
    Ok(saved["district"].clone())
}

#[test]
fn test_unknown_borough_is_rejected() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("unknown-borough");

    tonnage()?
        .args(["-b", "Atlantis", "-t", "PAPER", "-d", "9"])
        .arg("--store")
        .arg(&store)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: Borough not recognized."));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_all_validation_errors_are_printed() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("all-errors");

    tonnage()?
        .args(["-b", "Atlantis", "-t", "glass", "-d", "nine"])
        .arg("--store")
        .arg(&store)
        .assert()
        .code(2)
        .stderr(
            predicate::str::contains("Borough not recognized.")
                .and(predicate::str::contains("Type of garbage not recognized."))
                .and(predicate::str::contains("District should be a number")),
        );

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_missing_arguments_are_rejected() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("missing");

    tonnage()?
        .args(["-b", "Bronx"])
        .arg("--store")
        .arg(&store)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must be provided"));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_total_of_empty_store() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("empty-total");

    tonnage()?
        .arg("-get_total")
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Total garbage (refuse, paper, mgp) collected in all districts queried: 0 tons",
        ));

    // The schema step leaves an empty table behind.
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&store)?)?;
    assert_eq!(saved["district"], serde_json::json!({}));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_total_rounds_each_stored_figure() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("seeded-total");
    fs::write(
        &store,
        r#"{
  "district": {
    "01": {
      "communitydistrict": "01",
      "borough": "Bronx",
      "refusetonscollected": 1.4,
      "papertonscollected": 2.6,
      "mgptonscollected": 0.0
    },
    "02": {
      "communitydistrict": "02",
      "borough": "Bronx",
      "refusetonscollected": 0.0,
      "papertonscollected": 0.0,
      "mgptonscollected": 0.0
    }
  }
}"#,
    )?;

    tonnage()?
        .args(["--get-total", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("queried: 4 tons"));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_total_skips_validation() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("total-skips-validation");

    tonnage()?
        .args(["-get_total", "-b", "Atlantis"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stderr(predicate::str::contains("Borough not recognized").not());

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_corrupt_store_is_fatal() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("corrupt");
    fs::write(&store, "this is not json")?;

    tonnage()?
        .arg("-get_total")
        .arg("--store")
        .arg(&store)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Failed to initialize the local store"));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_remote_failure_is_fatal() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("remote-failure");
    let closed = TcpListener::bind("127.0.0.1:0")?;
    let domain = format!("http://{}", closed.local_addr()?);
    drop(closed);

    lookup_against(&domain, &store)?
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("Error: Failed to look up Bronx district 09")
                .and(predicate::str::contains("Network error")),
        );

    assert_eq!(stored_districts(&store)?, serde_json::json!({}));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_empty_result_reports_zero_tons() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("empty-result");
    let (domain, server) = serve_once("[]")?;

    lookup_against(&domain, &store)?
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "PAPER collected in Bronx in district 09 during January 2015: \n0 tons",
        ));
    server.join().expect("server thread panicked");

    assert_eq!(stored_districts(&store)?, serde_json::json!({}));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_found_row_is_reported_and_cached() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("found-row");
    let (domain, server) = serve_once(
        r#"[{"month":"2015 / 01","borough":"Bronx","communitydistrict":"09","refusetonscollected":"4795.4","papertonscollected":"352.5","mgptonscollected":"287.6"}]"#,
    )?;

    lookup_against(&domain, &store)?
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "PAPER collected in Bronx in district 09 during January 2015: \n352 tons",
        ));
    server.join().expect("server thread panicked");

    let districts = stored_districts(&store)?;
    assert_eq!(districts["09"]["borough"], "Bronx");
    assert_eq!(districts["09"]["papertonscollected"], 352.5);

    tonnage()?
        .args(["-get_total", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("queried: 5435 tons"));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_invalid_tonnage_is_not_cached() -> Result<(), Box<dyn Error>> {
    let store = scratch_store("invalid-tonnage");
    let (domain, server) = serve_once(
        r#"[{"borough":"Bronx","communitydistrict":"09","refusetonscollected":"NaN","papertonscollected":"-12.0"}]"#,
    )?;

    lookup_against(&domain, &store)?
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid tonnage"));
    server.join().expect("server thread panicked");

    assert_eq!(stored_districts(&store)?, serde_json::json!({}));

    // The store stays readable for later runs.
    tonnage()?
        .args(["-get_total", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("queried: 0 tons"));

    fs::remove_file(&store)?;
    Ok(())
}

#[test]
fn test_version_flag() -> Result<(), Box<dyn Error>> {
    tonnage()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    Ok(())
}
