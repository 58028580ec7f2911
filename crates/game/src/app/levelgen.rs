//! Course acquisition: the built-in course, plus optional fetches from the
//! Gemini generateContent endpoint on a background worker thread.

use std::env;
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
const MODEL_ENV_VAR: &str = "FLAGRUN_GEN_MODEL";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const ENDPOINT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_LEVEL_ROWS: [&str; 14] = [
    "....................................................................................................",
    "....................................................................................................",
    "....................................................................................................",
    "....................................................................................................",
    "....................................................................................................",
    "....................................................................................................",
    "....................................................................................................",
    "....................................................................................................",
    "...................?????........................................................................",
    ".................#.......#..........................................................................",
    "....................................................................................................",
    ".........E.................................E.......................................F................",
    ".....T...T........................PTT..............................................|................",
    "################..############...#####...###################..#######...############################",
];

const LEVEL_PROMPT: &str = "Generate a playable 2D platformer level map.
Height: 14 rows.
Width: 80 columns.
Characters:
'.' = Sky/Empty
'#' = Ground Block
'B' = Brick Block
'?' = Question Block
'T' = Hard Block (Steps)
'P' = Pipe Body (just use 'P' for the pipe stack)
'E' = Enemy (Goomba)
'F' = Flag pole (at the end)
'|' = Flag pole stick

Rules:
- The bottom row (index 13) should be mostly '#' (Ground), with some gaps (pits) for challenge.
- Ensure jumps are possible. Max jump height is about 4 blocks.
- Place enemies 'E' on the ground.
- Place '?' and 'B' in the air reachable by jumping.
- Create some stairs using 'T'.
- Place a flag 'F' near the end.";

#[derive(Debug, Clone)]
pub(crate) struct GenerationConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) model: String,
}

impl GenerationConfig {
    pub(crate) fn from_env() -> Self {
        Self::resolve(read_env_string(API_KEY_ENV_VAR), read_env_string(MODEL_ENV_VAR))
    }

    fn resolve(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            model: model
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

fn read_env_string(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(value) => Some(value),
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(env_var = var, error = %err, "unable to read env var; ignoring it");
            None
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum LevelFetchError {
    #[error("no API key configured in {API_KEY_ENV_VAR}")]
    MissingApiKey,
    #[error("generation request failed")]
    Transport(#[from] ureq::Error),
    #[error("could not read the generation response body")]
    Read(#[from] io::Error),
    #[error("generation response shape was invalid: {0}")]
    Shape(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("generated level contained no rows")]
    EmptyLevel,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: RequestGenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct RequestGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LevelPayload {
    level: Vec<String>,
}

/// Blocking fetch of a generated course. Runs on the worker thread.
pub(crate) fn fetch_level(config: &GenerationConfig) -> Result<Vec<String>, LevelFetchError> {
    let Some(api_key) = &config.api_key else {
        return Err(LevelFetchError::MissingApiKey);
    };

    let request = GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: LEVEL_PROMPT }],
        }],
        generation_config: RequestGenerationConfig {
            response_mime_type: "application/json",
            response_schema: level_schema(),
        },
    };

    let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
    let url = format!("{ENDPOINT_BASE}/{}:generateContent", config.model);
    let response = agent
        .post(&url)
        .set("x-goog-api-key", api_key)
        .send_json(&request)?;
    let body: GenerateResponse = response.into_json()?;

    let text = body
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .unwrap_or_default();
    parse_generated_payload(&text)
}

fn level_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "level": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "The rows of the level map."
            }
        }
    })
}

pub(crate) fn parse_generated_payload(text: &str) -> Result<Vec<String>, LevelFetchError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let payload: LevelPayload = serde_path_to_error::deserialize(&mut deserializer)?;
    if payload.level.is_empty() {
        return Err(LevelFetchError::EmptyLevel);
    }
    Ok(payload.level)
}

/// Kick off a fetch without blocking the frame loop. The receiver reports
/// exactly one outcome; a worker that cannot start reports by disconnecting.
pub(crate) fn spawn_fetch(
    config: GenerationConfig,
) -> Receiver<Result<Vec<String>, LevelFetchError>> {
    let (sender, receiver) = mpsc::channel();
    let spawn_result = thread::Builder::new()
        .name("levelgen".to_string())
        .spawn(move || {
            let outcome = fetch_level(&config);
            if sender.send(outcome).is_err() {
                warn!("level fetch finished after the scene stopped listening");
            }
        });
    if let Err(error) = spawn_result {
        warn!(error = %error, "could not spawn the level fetch worker");
    }
    receiver
}

pub(crate) fn default_level_rows() -> Vec<String> {
    DEFAULT_LEVEL_ROWS.iter().map(|row| (*row).to_string()).collect()
}

/// Stable fingerprint of a course, logged so runs can be correlated.
pub(crate) fn level_digest(rows: &[String]) -> String {
    let mut hasher = Sha256::new();
    for row in rows {
        hasher.update(row.as_bytes());
        hasher.update(b"\n");
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_well_formed() {
        let rows = default_level_rows();
        assert_eq!(rows.len(), 14);
        assert!(rows.iter().all(|row| !row.is_empty()));
        assert!(rows.iter().any(|row| row.contains('F')));
        assert!(rows[13].starts_with("################"));
    }

    #[test]
    fn digest_is_stable_and_row_sensitive() {
        let rows = default_level_rows();
        let digest = level_digest(&rows);
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, level_digest(&rows));

        let mut altered = rows.clone();
        altered[13] = altered[13].replace('#', ".");
        assert_ne!(digest, level_digest(&altered));
    }

    #[test]
    fn digest_distinguishes_row_boundaries() {
        let joined = vec!["##..".to_string()];
        let split = vec!["##".to_string(), "..".to_string()];
        assert_ne!(level_digest(&joined), level_digest(&split));
    }

    #[test]
    fn payload_parses_valid_json() {
        let rows = parse_generated_payload(r#####"{"level": ["....", "####"]}"#####).unwrap();
        assert_eq!(rows, vec!["....".to_string(), "####".to_string()]);
    }

    #[test]
    fn payload_rejects_wrong_shape_with_path() {
        let err = parse_generated_payload(r#####"{"level": "####"}"#####).unwrap_err();
        match err {
            LevelFetchError::Shape(inner) => {
                assert_eq!(inner.path().to_string(), "level");
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn payload_rejects_empty_level() {
        let err = parse_generated_payload(r#"{"level": []}"#).unwrap_err();
        assert!(matches!(err, LevelFetchError::EmptyLevel));
    }

    #[test]
    fn resolve_prefers_model_override() {
        let config = GenerationConfig::resolve(None, Some("gemini-exp".to_string()));
        assert_eq!(config.model, "gemini-exp");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn resolve_ignores_empty_values() {
        let config = GenerationConfig::resolve(Some(String::new()), Some(String::new()));
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn fetch_without_key_fails_fast() {
        let config = GenerationConfig::resolve(None, None);
        let err = fetch_level(&config).unwrap_err();
        assert!(matches!(err, LevelFetchError::MissingApiKey));
    }
}
