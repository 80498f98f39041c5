//! HTTP routes.

use axum::{
    extract::{
        multipart::MultipartError, rejection::JsonRejection, DefaultBodyLimit, FromRequest,
        Multipart, Path, Request, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use spiritdice_domain::{
    provision_for_level, ActiveEffect, ActiveEffectId, Character, CharacterId, DomainError,
    GlossaryTerm, GlossaryTermId, SpiritDiePool, Technique, TechniqueId,
};
use spiritdice_shared::{
    CreateActiveEffectRequest, CreateCharacterRequest, CreateGlossaryTermRequest, CreatePoolRequest, CreateTechniqueRequest,
    ErrorResponse, LevelDiceResponse, OverrideRequest, PortraitResponse, RollRequest,
    RollResponse, TechniqueEffectResponse, UpdateCharacterRequest, UpdateGlossaryTermRequest,
    UpdatePoolRequest, UpdateTechniqueRequest,
};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::spirit_dice::{CreatePoolInput, UpdatePoolInput};
use crate::use_cases::{
    ActiveEffectError, CharacterError, CreateActiveEffectInput, CreateCharacterInput, CreateTechniqueInput, GlossaryError, PortraitError,
    SpiritDiceError, TechniqueError, UpdateCharacterInput, UpdateGlossaryTermInput,
    UpdateTechniqueInput,
};

/// Multipart field carrying the portrait image.
const PORTRAIT_FIELD: &str = "portrait";

/// Room for multipart boundaries and part headers around the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create all HTTP routes.
///
/// `max_portrait_bytes` bounds the image accepted by the portrait upload.
pub fn routes(max_portrait_bytes: usize) -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        // Characters
        .route("/api/characters", get(list_characters))
        .route(
            "/api/character",
            get(get_default_character).post(create_character),
        )
        .route(
            "/api/character/{id}",
            get(get_character).put(update_character),
        )
        .route(
            "/api/character/{id}/portrait",
            post(upload_portrait)
                .delete(remove_portrait)
                .layer(DefaultBodyLimit::max(
                    max_portrait_bytes.saturating_add(MULTIPART_OVERHEAD),
                )),
        )
        // Spirit die pool
        .route(
            "/api/character/{id}/spirit-die-pool",
            get(get_pool)
                .post(create_pool)
                .put(update_pool)
                .delete(delete_pool),
        )
        .route("/api/character/{id}/roll", post(roll))
        .route("/api/character/{id}/long-rest", post(long_rest))
        .route(
            "/api/character/{id}/spirit-die-pool/restore/{index}",
            post(restore_slot),
        )
        .route(
            "/api/character/{id}/spirit-die-pool/override",
            put(apply_override),
        )
        .route(
            "/api/character/{id}/spirit-die-pool/reset",
            post(reset_to_level),
        )
        // Techniques
        .route(
            "/api/character/{id}/techniques",
            get(list_techniques).post(create_technique),
        )
        .route(
            "/api/techniques/{id}",
            put(update_technique).delete(delete_technique),
        )
        .route(
            "/api/techniques/{id}/investments",
            get(technique_investments),
        )
        .route(
            "/api/techniques/{id}/effects/{sp}",
            get(technique_effect),
        )
        // Glossary
        .route(
            "/api/character/{id}/glossary",
            get(list_glossary).post(create_glossary_term),
        )
        .route(
            "/api/glossary/{id}",
            put(update_glossary_term).delete(delete_glossary_term),
        )
        // Active effects
        .route(
            "/api/character/{id}/active-effects",
            get(list_active_effects).post(create_active_effect),
        )
        .route("/api/active-effects/{id}", delete(delete_active_effect))
        // Provisioning
        .route("/api/levels/{level}/dice", get(level_dice))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Characters
// =============================================================================

async fn list_characters(State(app): State<Arc<App>>) -> Result<Json<Vec<Character>>, ApiError> {
    Ok(Json(app.use_cases.character.list().await?))
}

async fn get_default_character(State(app): State<Arc<App>>) -> Result<Json<Character>, ApiError> {
    Ok(Json(app.use_cases.character.get_default().await?))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    Ok(Json(
        app.use_cases
            .character
            .get(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn create_character(
    State(app): State<Arc<App>>,
    ApiJson(req): ApiJson<CreateCharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .character
        .create(CreateCharacterInput {
            name: req.name,
            path: req.path,
            level: req.level,
        })
        .await?;
    Ok(Json(character))
}

async fn update_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateCharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .character
        .update(
            CharacterId::from_uuid(id),
            UpdateCharacterInput {
                name: req.name,
                path: req.path,
                level: req.level,
                portrait_url: req.portrait_url,
            },
        )
        .await?;
    Ok(Json(character))
}

/// Accepts `multipart/form-data` with the image in the `portrait` field.
async fn upload_portrait(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    request: Request,
) -> Result<Json<PortraitResponse>, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PORTRAIT_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        let portrait_url = app
            .use_cases
            .portrait
            .upload(
                CharacterId::from_uuid(id),
                content_type.as_deref(),
                bytes.to_vec(),
            )
            .await?;
        return Ok(Json(PortraitResponse { portrait_url }));
    }

    Err(PortraitError::Empty.into())
}

async fn remove_portrait(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    Ok(Json(
        app.use_cases
            .portrait
            .remove(CharacterId::from_uuid(id))
            .await?,
    ))
}

// =============================================================================
// Spirit die pool
// =============================================================================

async fn get_pool(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpiritDiePool>, ApiError> {
    Ok(Json(
        app.use_cases
            .spirit_dice
            .pool
            .get(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn create_pool(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CreatePoolRequest>,
) -> Result<Json<SpiritDiePool>, ApiError> {
    let pool = app
        .use_cases
        .spirit_dice
        .pool
        .create(
            CharacterId::from_uuid(id),
            CreatePoolInput {
                current_dice: req.current_dice,
                override_dice: req.override_dice,
            },
        )
        .await?;
    Ok(Json(pool))
}

async fn update_pool(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdatePoolRequest>,
) -> Result<Json<SpiritDiePool>, ApiError> {
    let pool = app
        .use_cases
        .spirit_dice
        .pool
        .update(
            CharacterId::from_uuid(id),
            UpdatePoolInput {
                current_dice: req.current_dice,
                override_dice: req.override_dice,
            },
        )
        .await?;
    Ok(Json(pool))
}

async fn delete_pool(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    app.use_cases
        .spirit_dice
        .pool
        .delete(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(json!({ "message": "Spirit die pool deleted" })))
}

/// Roll, then announce the result to every observer.
async fn roll(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<RollRequest>,
) -> Result<Json<RollResponse>, ApiError> {
    let sp_investment = req
        .sp_investment
        .ok_or_else(|| ApiError::BadRequest("Invalid SP investment".to_string()))?;
    let result = app
        .use_cases
        .spirit_dice
        .roll
        .execute(CharacterId::from_uuid(id), sp_investment, req.die_index)
        .await?;
    app.relay.publish(result.broadcast).await;
    Ok(Json(result.outcome.into()))
}

async fn long_rest(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpiritDiePool>, ApiError> {
    Ok(Json(
        app.use_cases
            .spirit_dice
            .pool
            .long_rest(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn restore_slot(
    State(app): State<Arc<App>>,
    Path((id, index)): Path<(Uuid, i64)>,
) -> Result<Json<SpiritDiePool>, ApiError> {
    let index = usize::try_from(index)
        .map_err(|_| ApiError::BadRequest(format!("Invalid die index {index}")))?;
    Ok(Json(
        app.use_cases
            .spirit_dice
            .pool
            .restore_slot(CharacterId::from_uuid(id), index)
            .await?,
    ))
}

async fn apply_override(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<OverrideRequest>,
) -> Result<Json<SpiritDiePool>, ApiError> {
    Ok(Json(
        app.use_cases
            .spirit_dice
            .pool
            .apply_override(CharacterId::from_uuid(id), req.override_dice)
            .await?,
    ))
}

async fn reset_to_level(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpiritDiePool>, ApiError> {
    Ok(Json(
        app.use_cases
            .spirit_dice
            .pool
            .reset_to_level(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn level_dice(Path(level): Path<i64>) -> Json<LevelDiceResponse> {
    Json(LevelDiceResponse {
        level,
        dice: provision_for_level(level),
    })
}

// =============================================================================
// Techniques
// =============================================================================

async fn list_techniques(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Technique>>, ApiError> {
    Ok(Json(
        app.use_cases
            .technique
            .list_active(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn create_technique(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CreateTechniqueRequest>,
) -> Result<Json<Technique>, ApiError> {
    let technique = app
        .use_cases
        .technique
        .create(
            CharacterId::from_uuid(id),
            CreateTechniqueInput {
                name: req.name,
                trigger_type: req.trigger_type,
                trigger_description: req.trigger_description,
                sp_effects: req.sp_effects,
            },
        )
        .await?;
    Ok(Json(technique))
}

async fn update_technique(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateTechniqueRequest>,
) -> Result<Json<Technique>, ApiError> {
    let technique = app
        .use_cases
        .technique
        .update(
            TechniqueId::from_uuid(id),
            UpdateTechniqueInput {
                name: req.name,
                trigger_type: req.trigger_type,
                trigger_description: req.trigger_description,
                sp_effects: req.sp_effects,
            },
        )
        .await?;
    Ok(Json(technique))
}

async fn delete_technique(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    app.use_cases
        .technique
        .deactivate(TechniqueId::from_uuid(id))
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn technique_investments(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<u32>>, ApiError> {
    Ok(Json(
        app.use_cases
            .technique
            .valid_investments(TechniqueId::from_uuid(id))
            .await?,
    ))
}

async fn technique_effect(
    State(app): State<Arc<App>>,
    Path((id, sp)): Path<(Uuid, i64)>,
) -> Result<Json<TechniqueEffectResponse>, ApiError> {
    let (sp_investment, tier) = app
        .use_cases
        .technique
        .resolve_effect(TechniqueId::from_uuid(id), sp)
        .await?;
    Ok(Json(TechniqueEffectResponse {
        sp_investment,
        tier,
    }))
}

// =============================================================================
// Glossary
// =============================================================================

async fn list_glossary(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<GlossaryTerm>>, ApiError> {
    Ok(Json(
        app.use_cases
            .glossary
            .list(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn create_glossary_term(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CreateGlossaryTermRequest>,
) -> Result<Json<GlossaryTerm>, ApiError> {
    let term = app
        .use_cases
        .glossary
        .create(CharacterId::from_uuid(id), req.keyword, req.definition)
        .await?;
    Ok(Json(term))
}

async fn update_glossary_term(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateGlossaryTermRequest>,
) -> Result<Json<GlossaryTerm>, ApiError> {
    let term = app
        .use_cases
        .glossary
        .update(
            GlossaryTermId::from_uuid(id),
            UpdateGlossaryTermInput {
                keyword: req.keyword,
                definition: req.definition,
            },
        )
        .await?;
    Ok(Json(term))
}

async fn delete_glossary_term(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    app.use_cases
        .glossary
        .delete(GlossaryTermId::from_uuid(id))
        .await?;
    Ok(Json(json!({ "success": true })))
}

// =============================================================================
// Active effects
// =============================================================================

async fn list_active_effects(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ActiveEffect>>, ApiError> {
    Ok(Json(
        app.use_cases
            .active_effect
            .list(CharacterId::from_uuid(id))
            .await?,
    ))
}

async fn create_active_effect(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CreateActiveEffectRequest>,
) -> Result<Json<ActiveEffect>, ApiError> {
    let effect = app
        .use_cases
        .active_effect
        .create(
            CharacterId::from_uuid(id),
            CreateActiveEffectInput {
                name: req.name,
                level: req.level,
                description: req.description,
            },
        )
        .await?;
    Ok(Json(effect))
}

async fn delete_active_effect(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    app.use_cases
        .active_effect
        .delete(ActiveEffectId::from_uuid(id))
        .await?;
    Ok(Json(json!({ "success": true })))
}

// =============================================================================
// Extractors
// =============================================================================

/// `Json` whose rejections answer 400 with the usual `{message}` body.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            RepoError::Conflict { .. } => ApiError::Conflict(e.to_string()),
            RepoError::Database { .. } | RepoError::Serialization(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            DomainError::Validation(msg)
            | DomainError::InvalidRequest(msg)
            | DomainError::Parse(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<SpiritDiceError> for ApiError {
    fn from(e: SpiritDiceError) -> Self {
        match e {
            SpiritDiceError::CharacterNotFound(_) | SpiritDiceError::PoolNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            SpiritDiceError::PoolExists(_) => ApiError::Conflict(e.to_string()),
            SpiritDiceError::OverrideTooLong { .. } => ApiError::BadRequest(e.to_string()),
            SpiritDiceError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            SpiritDiceError::Domain(e) => e.into(),
            SpiritDiceError::Repo(e) => e.into(),
        }
    }
}

impl From<PortraitError> for ApiError {
    fn from(e: PortraitError) -> Self {
        match e {
            PortraitError::CharacterNotFound(_) => ApiError::NotFound(e.to_string()),
            PortraitError::UnsupportedContentType(_) | PortraitError::Empty => {
                ApiError::BadRequest(e.to_string())
            }
            PortraitError::TooLarge { .. } => ApiError::PayloadTooLarge(e.to_string()),
            PortraitError::Blob(_) => ApiError::Internal(e.to_string()),
            PortraitError::Repo(e) => e.into(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

impl From<CharacterError> for ApiError {
    fn from(e: CharacterError) -> Self {
        match e {
            CharacterError::NotFound(_) | CharacterError::NoCharacters => {
                ApiError::NotFound(e.to_string())
            }
            CharacterError::Validation(e) => e.into(),
            CharacterError::SpiritDice(e) => e.into(),
            CharacterError::Portrait(e) => e.into(),
            CharacterError::Repo(e) => e.into(),
        }
    }
}

impl From<TechniqueError> for ApiError {
    fn from(e: TechniqueError) -> Self {
        match e {
            TechniqueError::NotFound(_)
            | TechniqueError::CharacterNotFound(_)
            | TechniqueError::EffectNotFound { .. } => ApiError::NotFound(e.to_string()),
            TechniqueError::Validation(e) => e.into(),
            TechniqueError::Repo(e) => e.into(),
        }
    }
}

impl From<GlossaryError> for ApiError {
    fn from(e: GlossaryError) -> Self {
        match e {
            GlossaryError::NotFound(_) | GlossaryError::CharacterNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            GlossaryError::DuplicateKeyword(_) => ApiError::Conflict(e.to_string()),
            GlossaryError::Validation(e) => e.into(),
            GlossaryError::Repo(e) => e.into(),
        }
    }
}

impl From<ActiveEffectError> for ApiError {
    fn from(e: ActiveEffectError) -> Self {
        match e {
            ActiveEffectError::NotFound(_) | ActiveEffectError::CharacterNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            ActiveEffectError::Validation(e) => e.into(),
            ActiveEffectError::Repo(e) => e.into(),
        }
    }
}
