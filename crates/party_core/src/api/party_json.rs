//! JSON API for party operations
//!
//! Typed request/response boundary for hosts (HTTP handlers, bots, schedulers).
//! Every entry point takes a JSON string, validates the request once, runs the
//! engine against a fresh table snapshot and returns an `ApiResponse<T>` JSON string.

use crate::comparator::StrategyComparison;
use crate::editor::EditOperation;
use crate::engine::{PartyEngine, StrategyCatalog};
use crate::error::EngineError;
use crate::models::{ActivityRequirement, CharacterRecord, Party, PartySize, SquadStats, Strategy};
use crate::validator::ValidationReport;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{error, info, warn};

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured API error with codes and details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: None }
    }

    pub fn with_details(
        code: &str,
        message: &str,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: Some(details) }
    }

    pub fn invalid_request(message: &str) -> Self {
        Self::new("INVALID_REQUEST", message)
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        let mut details = HashMap::new();
        match &error {
            EngineError::InsufficientPool { required, available } => {
                details.insert("required".to_string(), serde_json::json!(required));
                details.insert("available".to_string(), serde_json::json!(available));
            }
            EngineError::InvalidSlot { index, size } => {
                details.insert("index".to_string(), serde_json::json!(index));
                details.insert("size".to_string(), serde_json::json!(size));
            }
            EngineError::InvalidSquad { index, count } => {
                details.insert("index".to_string(), serde_json::json!(index));
                details.insert("count".to_string(), serde_json::json!(count));
            }
            EngineError::UnsupportedPartySize(_) | EngineError::TableLoad(_) => {}
        }

        if details.is_empty() {
            Self::new(error.code(), &error.to_string())
        } else {
            Self::with_details(error.code(), &error.to_string(), details)
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Requests / Responses
// =============================================================================

/// Party build request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPartyRequest {
    pub schema_version: Option<String>,
    pub activity: String,
    pub party_size: usize,
    pub strategy: Strategy,
    pub pinned_first: Option<bool>, // default: true
    pub characters: Vec<CharacterRecord>,
}

/// Party build response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPartyResponse {
    pub requirement: ActivityRequirement,
    pub party: Party,
    pub stats: Vec<SquadStats>,
    pub validation: ValidationReport,
}

/// Party validation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatePartyRequest {
    pub schema_version: Option<String>,
    pub activity: String,
    pub party: Party,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatePartyResponse {
    pub requirement: ActivityRequirement,
    pub report: ValidationReport,
}

/// Party edit request
///
/// `operation` is kept as raw JSON so an unknown `op` is reported as an
/// `INVALID_REQUEST` rather than a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPartyRequest {
    pub schema_version: Option<String>,
    pub party: Party,
    pub operation: serde_json::Value,
    /// When set, the edited party is validated against this activity.
    pub activity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPartyResponse {
    pub operation: String,
    pub party: Party,
    pub validation: Option<ValidationReport>,
}

/// Strategy comparison request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareStrategiesRequest {
    pub schema_version: Option<String>,
    pub activity: String,
    pub party_size: usize,
    pub characters: Vec<CharacterRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareStrategiesResponse {
    pub requirement: ActivityRequirement,
    pub comparison: StrategyComparison,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyCatalogRequest {
    pub schema_version: Option<String>,
}

// =============================================================================
// Validation
// =============================================================================

const EDIT_OPERATIONS: [&str; 4] = ["swap", "move", "add", "remove"];

fn validate_activity(activity: &str) -> Result<(), ApiError> {
    if activity.trim().is_empty() {
        return Err(ApiError::invalid_request("Activity name must not be empty"));
    }
    Ok(())
}

fn validate_party_size(party_size: usize) -> Result<(), ApiError> {
    if PartySize::from_members(party_size).is_err() {
        return Err(ApiError::invalid_request(&format!(
            "Party size must be 4 or 8, got {}",
            party_size
        )));
    }
    Ok(())
}

fn validate_pool(characters: &[CharacterRecord]) -> Result<(), ApiError> {
    let mut seen = HashSet::new();
    let duplicates: BTreeSet<&str> = characters
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| !seen.insert(*id))
        .collect();

    if !duplicates.is_empty() {
        let mut details = HashMap::new();
        details.insert("duplicate_ids".to_string(), serde_json::json!(duplicates));
        return Err(ApiError::with_details(
            "INVALID_REQUEST",
            "Character ids must be unique within the pool",
            details,
        ));
    }

    if characters.iter().any(|c| c.id.trim().is_empty()) {
        return Err(ApiError::invalid_request("Character id must not be empty"));
    }
    Ok(())
}

impl BuildPartyRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_activity(&self.activity)?;
        validate_party_size(self.party_size)?;
        validate_pool(&self.characters)
    }
}

impl ValidatePartyRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_activity(&self.activity)
    }
}

impl CompareStrategiesRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_activity(&self.activity)?;
        validate_party_size(self.party_size)?;
        validate_pool(&self.characters)
    }
}

impl EditPartyRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(activity) = &self.activity {
            validate_activity(activity)?;
        }
        self.parsed_operation().map(|_| ())
    }

    /// Typed edit operation
    pub fn parsed_operation(&self) -> Result<EditOperation, ApiError> {
        let op = self.operation.get("op").and_then(|v| v.as_str()).unwrap_or_default();
        if !EDIT_OPERATIONS.contains(&op) {
            return Err(ApiError::invalid_request(&format!(
                "Unknown edit operation '{}' (expected one of {})",
                op,
                EDIT_OPERATIONS.join(", ")
            )));
        }
        serde_json::from_value(self.operation.clone()).map_err(|e| {
            ApiError::invalid_request(&format!("Invalid '{}' operation: {}", op, e))
        })
    }
}

// =============================================================================
// Entry points
// =============================================================================

fn to_json<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| "{}".to_string())
}

fn parse_request<R: DeserializeOwned>(request_json: &str, name: &str) -> Result<R, ApiError> {
    serde_json::from_str(request_json).map_err(|e| {
        error!("Failed to parse {}: {}", name, e);
        ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e))
    })
}

/// Build a party from JSON request string
///
/// # Returns
/// JSON string containing ApiResponse<BuildPartyResponse>
pub fn build_party_json(request_json: &str) -> String {
    info!("Processing party build request");

    let request: BuildPartyRequest = match parse_request(request_json, "BuildPartyRequest") {
        Ok(req) => req,
        Err(error) => return to_json(&ApiResponse::<BuildPartyResponse>::error(error)),
    };

    if let Err(error) = request.validate() {
        warn!("Party build request validation failed: {:?}", error);
        return to_json(&ApiResponse::<BuildPartyResponse>::error(error));
    }

    let engine = PartyEngine::from_global();
    let requirement = engine.resolve(&request.activity);
    match engine.build(
        &request.characters,
        &request.activity,
        request.party_size,
        request.strategy,
        request.pinned_first.unwrap_or(true),
    ) {
        Ok(party) => {
            let stats = party.squads().iter().map(|s| s.stats()).collect();
            let validation = crate::validator::validate_party(&party, &requirement);
            info!(
                "Built {} party for {} (score {:.2}, valid: {})",
                party.scored_by(),
                requirement.key,
                party.score(),
                validation.is_valid
            );
            to_json(&ApiResponse::success(BuildPartyResponse { requirement, party, stats, validation }))
        }
        Err(e) => {
            error!("Failed to build party: {}", e);
            to_json(&ApiResponse::<BuildPartyResponse>::error(e.into()))
        }
    }
}

/// Validate a party from JSON request string
///
/// # Returns
/// JSON string containing ApiResponse<ValidatePartyResponse>
pub fn validate_party_json(request_json: &str) -> String {
    info!("Processing party validation request");

    let request: ValidatePartyRequest = match parse_request(request_json, "ValidatePartyRequest") {
        Ok(req) => req,
        Err(error) => return to_json(&ApiResponse::<ValidatePartyResponse>::error(error)),
    };

    if let Err(error) = request.validate() {
        warn!("Party validation request rejected: {:?}", error);
        return to_json(&ApiResponse::<ValidatePartyResponse>::error(error));
    }

    let engine = PartyEngine::from_global();
    let requirement = engine.resolve(&request.activity);
    let party = engine.assign_roles(request.party);
    let report = crate::validator::validate_party(&party, &requirement);
    to_json(&ApiResponse::success(ValidatePartyResponse { requirement, report }))
}

/// Apply an edit operation from JSON request string
///
/// # Returns
/// JSON string containing ApiResponse<EditPartyResponse>
pub fn edit_party_json(request_json: &str) -> String {
    info!("Processing party edit request");

    let request: EditPartyRequest = match parse_request(request_json, "EditPartyRequest") {
        Ok(req) => req,
        Err(error) => return to_json(&ApiResponse::<EditPartyResponse>::error(error)),
    };

    let operation = match request.validate().and_then(|_| request.parsed_operation()) {
        Ok(op) => op,
        Err(error) => {
            warn!("Party edit request validation failed: {:?}", error);
            return to_json(&ApiResponse::<EditPartyResponse>::error(error));
        }
    };

    let engine = PartyEngine::from_global();
    let name = operation.name().to_string();
    match engine.edit(&request.party, operation) {
        Ok(party) => {
            let validation = request.activity.as_deref().map(|a| engine.validate(&party, a));
            to_json(&ApiResponse::success(EditPartyResponse { operation: name, party, validation }))
        }
        Err(e) => {
            warn!("Edit '{}' failed: {}", name, e);
            to_json(&ApiResponse::<EditPartyResponse>::error(e.into()))
        }
    }
}

/// Compare every strategy from JSON request string
///
/// # Returns
/// JSON string containing ApiResponse<CompareStrategiesResponse>
pub fn compare_strategies_json(request_json: &str) -> String {
    info!("Processing strategy comparison request");

    let request: CompareStrategiesRequest =
        match parse_request(request_json, "CompareStrategiesRequest") {
            Ok(req) => req,
            Err(error) => return to_json(&ApiResponse::<CompareStrategiesResponse>::error(error)),
        };

    if let Err(error) = request.validate() {
        warn!("Strategy comparison request validation failed: {:?}", error);
        return to_json(&ApiResponse::<CompareStrategiesResponse>::error(error));
    }

    let engine = PartyEngine::from_global();
    let requirement = engine.resolve(&request.activity);
    match engine.compare(&request.characters, &request.activity, request.party_size) {
        Ok(comparison) => to_json(&ApiResponse::success(CompareStrategiesResponse {
            requirement,
            comparison,
        })),
        Err(e) => {
            error!("Failed to compare strategies: {}", e);
            to_json(&ApiResponse::<CompareStrategiesResponse>::error(e.into()))
        }
    }
}

/// List strategies with their descriptions and hybrid weights
///
/// # Returns
/// JSON string containing ApiResponse<StrategyCatalog>
pub fn strategy_catalog_json(request_json: &str) -> String {
    let request: StrategyCatalogRequest = if request_json.trim().is_empty() {
        StrategyCatalogRequest::default()
    } else {
        match parse_request(request_json, "StrategyCatalogRequest") {
            Ok(req) => req,
            Err(error) => return to_json(&ApiResponse::<StrategyCatalog>::error(error)),
        }
    };

    if let Some(version) = &request.schema_version {
        if version != API_VERSION {
            warn!("Strategy catalog requested with schema version {}", version);
        }
    }

    to_json(&ApiResponse::success(PartyEngine::from_global().strategy_catalog()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn character(id: &str, job: &str, grow: &str, prestige: u64) -> Value {
        json!({ "id": id, "name": id, "job_name": job, "job_grow_name": grow, "prestige": prestige })
    }

    fn nabel_pool() -> Vec<Value> {
        vec![
            character("d1", "귀검사(남)", "眞 웨펀마스터", 80_000),
            character("d2", "도적", "眞 로그", 75_000),
            character("d3", "나이트", "眞 엘븐나이트", 70_000),
            character("b1", "프리스트(남)", "眞 크루세이더", 65_000),
        ]
    }

    fn parse(response: &str) -> Value {
        serde_json::from_str(response).unwrap()
    }

    #[test]
    fn test_build_party_json_success() {
        let request = json!({
            "activity": "나벨",
            "party_size": 4,
            "strategy": "efficiency",
            "characters": nabel_pool(),
        });
        let response = parse(&build_party_json(&request.to_string()));
        assert_eq!(response["success"], true);
        assert_eq!(response["data"]["party"]["layout"], "single");
        assert_eq!(response["data"]["party"]["score"]["kind"], "efficiency");
        assert_eq!(response["data"]["validation"]["is_valid"], true);
        assert_eq!(response["schema_version"], API_VERSION);
    }

    #[test]
    fn test_invalid_json() {
        let response = parse(&build_party_json("{not json"));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "INVALID_JSON");
    }

    #[test]
    fn test_boundary_validation() {
        let request = json!({
            "activity": "  ",
            "party_size": 4,
            "strategy": "efficiency",
            "characters": nabel_pool(),
        });
        let response = parse(&build_party_json(&request.to_string()));
        assert_eq!(response["error"]["code"], "INVALID_REQUEST");

        let request = json!({
            "activity": "nabel",
            "party_size": 5,
            "strategy": "efficiency",
            "characters": nabel_pool(),
        });
        let response = parse(&build_party_json(&request.to_string()));
        assert_eq!(response["error"]["code"], "INVALID_REQUEST");

        let mut pool = nabel_pool();
        pool.push(character("d1", "도적", "眞 로그", 1));
        let request = json!({
            "activity": "nabel",
            "party_size": 4,
            "strategy": "efficiency",
            "characters": pool,
        });
        let response = parse(&build_party_json(&request.to_string()));
        assert_eq!(response["error"]["code"], "INVALID_REQUEST");
        assert_eq!(response["error"]["details"]["duplicate_ids"], json!(["d1"]));
    }

    #[test]
    fn test_insufficient_pool_code() {
        let request = json!({
            "activity": "nabel",
            "party_size": 8,
            "strategy": "balance",
            "characters": nabel_pool(),
        });
        let response = parse(&build_party_json(&request.to_string()));
        assert_eq!(response["error"]["code"], "INSUFFICIENT_POOL");
        assert_eq!(response["error"]["details"]["required"], 8);
    }

    #[test]
    fn test_edit_and_validate_round() {
        let request = json!({
            "activity": "nabel",
            "party_size": 4,
            "strategy": "efficiency",
            "characters": nabel_pool(),
        });
        let built = parse(&build_party_json(&request.to_string()));
        let party = built["data"]["party"].clone();

        let edit = json!({
            "party": party,
            "operation": { "op": "remove", "slot": 3 },
            "activity": "nabel",
        });
        let edited = parse(&edit_party_json(&edit.to_string()));
        assert_eq!(edited["success"], true);
        assert_eq!(edited["data"]["operation"], "remove");
        assert_eq!(edited["data"]["validation"]["is_valid"], false);

        let unknown = json!({ "party": party, "operation": { "op": "shuffle" } });
        let response = parse(&edit_party_json(&unknown.to_string()));
        assert_eq!(response["error"]["code"], "INVALID_REQUEST");

        let out_of_range = json!({ "party": party, "operation": { "op": "remove", "slot": 4 } });
        let response = parse(&edit_party_json(&out_of_range.to_string()));
        assert_eq!(response["error"]["code"], "INVALID_SLOT");

        let validate = json!({ "activity": "nabel", "party": party });
        let response = parse(&validate_party_json(&validate.to_string()));
        assert_eq!(response["data"]["report"]["is_valid"], true);
    }

    #[test]
    fn test_validate_classifies_slots_without_roles() {
        let request = json!({
            "activity": "nabel",
            "party_size": 4,
            "strategy": "efficiency",
            "characters": nabel_pool(),
        });
        let built = parse(&build_party_json(&request.to_string()));
        let mut party = built["data"]["party"].clone();
        for slot in party["slots"].as_array_mut().unwrap() {
            slot["assigned_role"] = Value::Null;
        }

        let validate = json!({ "activity": "nabel", "party": party });
        let response = parse(&validate_party_json(&validate.to_string()));
        assert_eq!(response["data"]["report"]["is_valid"], true);
        assert_eq!(response["data"]["report"]["composition"][0]["dealers"], 3);
        assert_eq!(response["data"]["report"]["composition"][0]["buffers"], 1);
    }

    #[test]
    fn test_compare_and_catalog() {
        let request = json!({ "activity": "카인", "party_size": 4, "characters": nabel_pool() });
        let response = parse(&compare_strategies_json(&request.to_string()));
        assert_eq!(response["success"], true);
        assert_eq!(response["data"]["comparison"]["ranking"].as_array().map(Vec::len), Some(5));
        let recommended = response["data"]["comparison"]["recommended_strategy"].as_str().unwrap();
        assert!(recommended == "synergy" || recommended == "balance");

        let catalog = parse(&strategy_catalog_json(""));
        assert_eq!(catalog["data"]["strategies"].as_array().map(Vec::len), Some(5));
        assert_eq!(catalog["data"]["hybrid_weights"]["raid"]["synergy"], 0.3);
    }
}
