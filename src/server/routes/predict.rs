use crate::error::PredictError;
use crate::pipeline::{
    FoodPrediction, FoodRecommendation, SentimentPrediction, classify_food_image,
    predict_sentiment, recommend_food,
};
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::ServerState;
use axum::Json;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Body of both text endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Classify an uploaded food photo (POST /predict)
///
/// Expects `multipart/form-data` with the image in a part named `file`.
/// When no part carries that name, the first part with a filename is used.
///
/// # Response
///
/// ```json
/// { "food": "Pizza", "confidence": 93.41 }
/// ```
pub async fn predict_image(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<FoodPrediction>> {
    let mut multipart = multipart.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let upload = read_upload(&mut multipart, state.config.max_body_size_mb).await?;

    let registry = state.registry.clone();
    let prediction = run_prediction("predict", move || {
        classify_food_image(&registry, &upload)
    })
    .await?;

    tracing::debug!(food = %prediction.food, confidence = prediction.confidence, "image classified");
    Ok(Json(prediction))
}

/// Review sentiment (POST /predict_sentiment)
///
/// # Response
///
/// ```json
/// { "sentiment": "Positive", "confidence": 97.12, "text": "Loved it!" }
/// ```
pub async fn predict_review_sentiment(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ServerResult<Json<SentimentPrediction>> {
    let request = text_request(payload, state.config.max_body_size_mb)?;

    let registry = state.registry.clone();
    let prediction = run_prediction("predict_sentiment", move || {
        predict_sentiment(&registry, &request.text)
    })
    .await?;

    tracing::debug!(
        sentiment = ?prediction.sentiment,
        confidence = prediction.confidence,
        "review scored"
    );
    Ok(Json(prediction))
}

/// Dish suggestion from free text (POST /recommend_food)
///
/// # Response
///
/// ```json
/// { "food_class": "sushi", "food_name": "Sushi", "confidence": 0.8123 }
/// ```
pub async fn recommend(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ServerResult<Json<FoodRecommendation>> {
    let request = text_request(payload, state.config.max_body_size_mb)?;

    let registry = state.registry.clone();
    let recommendation = run_prediction("recommend_food", move || {
        recommend_food(&registry, &request.text)
    })
    .await?;

    tracing::debug!(
        food_class = %recommendation.food_class,
        confidence = recommendation.confidence,
        "food recommended"
    );
    Ok(Json(recommendation))
}

fn text_request(
    payload: Result<Json<TextRequest>, JsonRejection>,
    max_body_size_mb: usize,
) -> ServerResult<TextRequest> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ServerError::PayloadTooLarge(max_body_size_mb))
        }
        Err(rejection) => Err(ServerError::InvalidPayload(rejection.body_text())),
    }
}

async fn read_upload(multipart: &mut Multipart, max_body_size_mb: usize) -> ServerResult<Bytes> {
    let to_err = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(max_body_size_mb)
        } else {
            ServerError::BadRequest(e.body_text())
        }
    };

    let mut fallback = None;
    while let Some(field) = multipart.next_field().await.map_err(to_err)? {
        let named_file = field.name() == Some("file");
        if named_file || (fallback.is_none() && field.file_name().is_some()) {
            let data = field.bytes().await.map_err(to_err)?;
            if named_file {
                return Ok(data);
            }
            fallback = Some(data);
        }
    }

    fallback.ok_or_else(|| ServerError::BadRequest("No file uploaded".into()))
}

/// Runs a pipeline on the blocking pool and records its outcome.
async fn run_prediction<T, F>(endpoint: &'static str, job: F) -> ServerResult<T>
where
    F: FnOnce() -> Result<T, PredictError> + Send + 'static,
    T: Send + 'static,
{
    let started = Instant::now();
    let outcome = tokio::task::spawn_blocking(job).await;
    metrics::histogram!("foodai_inference_seconds", "endpoint" => endpoint)
        .record(started.elapsed().as_secs_f64());
    metrics::counter!("foodai_requests_total", "endpoint" => endpoint).increment(1);

    let result = outcome.map_err(|e| ServerError::Pipeline(format!("prediction task failed: {e}")));
    match result.and_then(|r| r.map_err(ServerError::from)) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(endpoint, code = err.error_code(), error = %err, "prediction failed");
            metrics::counter!(
                "foodai_request_errors_total",
                "endpoint" => endpoint,
                "code" => err.error_code()
            )
            .increment(1);
            Err(err)
        }
    }
}
