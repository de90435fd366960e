use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use cabrs_terminal::predictor::{run_best_matchup, ScenarioRequest};

const PREDICT_BODY: &str = r#"{
    "top_recommendation": "JJ Bumrah",
    "confidence": 87.5,
    "predictions": [
        {"bowler": "JJ Bumrah", "predicted_score": 1.42},
        {"bowler": "YS Chahal", "predicted_score": 2.15}
    ]
}"#;

const BIO_BODY: &str = r#"{"bio": "Right-arm fast, lethal yorkers."}"#;

fn request() -> ScenarioRequest {
    ScenarioRequest {
        venue: "Wankhede Stadium".to_string(),
        striker: "V Kohli".to_string(),
        non_striker: "RG Sharma".to_string(),
        over: 17,
        inning: 2,
        bowler_list: vec!["JJ Bumrah".to_string(), "YS Chahal".to_string()],
    }
}

fn write_response(mut stream: TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(response.as_bytes())
        .expect("canned response should write");
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).expect("request should read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = find_subslice(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let body_len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|val| val.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// One-thread canned backend: answers `/predict` with a fixed ranking and the
/// bio endpoint with either the fixture bio or a 500.
fn spawn_backend(bio_ok: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("loopback bind should succeed");
    let base = format!("http://{}", listener.local_addr().expect("bound address"));
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let request = read_request(&mut stream);
            let path = request
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("")
                .to_string();
            if path == "/predict" {
                write_response(stream, "200 OK", PREDICT_BODY);
            } else if path.starts_with("/get_player_bio/") {
                if !bio_ok {
                    write_response(stream, "500 Internal Server Error", "{}");
                } else if path.ends_with("/JJ%20Bumrah") {
                    write_response(stream, "200 OK", BIO_BODY);
                } else {
                    // Bio lookups must be keyed by the encoded top
                    // recommendation; anything else is a test failure
                    // surfaced as a parse error on the client side.
                    write_response(stream, "200 OK", "\"unexpected bio path\"");
                }
            } else {
                write_response(stream, "404 Not Found", "{}");
            }
        }
    });
    base
}

#[test]
fn best_matchup_merges_the_bio_into_the_result() {
    let base = spawn_backend(true);
    let result =
        run_best_matchup(&base, &request()).expect("two-stage pipeline should succeed");
    assert_eq!(result.top_recommendation, "JJ Bumrah");
    assert_eq!(result.predictions.len(), 2);
    assert_eq!(result.predictions[0].bowler, "JJ Bumrah");
    assert_eq!(result.bio, "Right-arm fast, lethal yorkers.");
}

#[test]
fn bio_failure_fails_the_whole_workflow() {
    let base = spawn_backend(false);
    let err = run_best_matchup(&base, &request())
        .expect_err("a failed bio lookup must fail the pipeline");
    assert!(
        format!("{err:#}").contains("player bio fetch failed"),
        "error should carry the bio-stage context: {err:#}"
    );
}
