//! Maintenance window redirect.
//!
//! `GET /window/{day}/{hour}` resolves the image tag for the window and
//! redirects to `/tag/<YYYYMMDD>`. axum paths carry no pattern constraints, so
//! the segment shapes are checked by the [`WindowPath`] extractor: a day is one
//! digit `0`-`6`, an hour exactly two digits `00`-`23`. Anything else is a
//! plain 404, exactly as an unknown route.

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header::LOCATION, request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::config::TAG_PATH_PREFIX;
use crate::error::AppError;
use crate::resolver::{resolve_tag, Tag};
use crate::state::AppState;

/// Raw `day` and `hour` path segments that match the route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPath {
    pub day: String,
    pub hour: String,
}

impl<S> FromRequestParts<S> for WindowPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((day, hour)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !is_day_segment(&day) || !is_hour_segment(&hour) {
            tracing::debug!(%day, %hour, "Window path does not match route pattern");
            return Err(StatusCode::NOT_FOUND.into_response());
        }

        Ok(Self { day, hour })
    }
}

/// `[0-6]`
pub fn is_day_segment(segment: &str) -> bool {
    matches!(segment.as_bytes(), [b'0'..=b'6'])
}

/// `2[0-3]|[01][0-9]`
pub fn is_hour_segment(segment: &str) -> bool {
    matches!(
        segment.as_bytes(),
        [b'2', b'0'..=b'3'] | [b'0' | b'1', b'0'..=b'9']
    )
}

/// Redirects a maintenance window to the tag that currently applies to it.
pub async fn window(State(state): State<AppState>, path: WindowPath) -> Result<Response, AppError> {
    let day: u32 = path.day.parse().map_err(|source| {
        tracing::error!(day = %path.day, error = %source, "Error parsing day");
        AppError::InvalidSegment {
            segment: "day",
            source,
        }
    })?;

    let hour: u32 = path.hour.parse().map_err(|source| {
        tracing::error!(hour = %path.hour, error = %source, "Error parsing hour");
        AppError::InvalidSegment {
            segment: "hour",
            source,
        }
    })?;

    let now = state.now();
    let tag = resolve_tag(state.image_day(), day, hour, &now).map_err(|e| {
        tracing::error!(day, hour, error = %e, "Failed to resolve tag");
        AppError::from(e)
    })?;

    tracing::info!(
        now = %now.to_rfc3339(),
        day,
        hour,
        image_day = %state.image_day(),
        tag = %tag,
        "Serving tag"
    );

    Ok(found(&tag))
}

/// `302 Found` pointing at the tag.
fn found(tag: &Tag) -> Response {
    let location = format!("{}{}", TAG_PATH_PREFIX, tag);
    let body = Html(format!("<a href=\"{}\">Found</a>.\n", location));
    (StatusCode::FOUND, [(LOCATION, location)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::resolver::ImageDay;
    use crate::routes::create_router;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use chrono::{DateTime, Local, TimeZone};
    use tower::ServiceExt;

    /// Friday 2020-06-05 22:00 local time
    fn friday_night() -> DateTime<Local> {
        Local.with_ymd_and_hms(2020, 6, 5, 22, 0, 0).unwrap()
    }

    fn state(image_day: u32) -> AppState {
        let mut config = AppConfig::default();
        config.schedule.image_day = ImageDay::from_index(image_day).unwrap();
        AppState::with_clock(config, friday_night)
    }

    async fn send(
        state: AppState,
        method: Method,
        uri: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let response = create_router(state)
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty())?)
            .await?;
        Ok(response)
    }

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn test_day_segment() {
        for ok in ["0", "3", "6"] {
            assert!(is_day_segment(ok), "{ok}");
        }
        for bad in ["7", "11", "", "a", "-1", "05"] {
            assert!(!is_day_segment(bad), "{bad}");
        }
    }

    #[test]
    fn test_hour_segment() {
        for ok in ["00", "09", "14", "19", "20", "23"] {
            assert!(is_hour_segment(ok), "{ok}");
        }
        for bad in ["4", "24", "29", "30", "004", "", "ab", "2"] {
            assert!(!is_hour_segment(bad), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_window_redirects() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(state(1), Method::GET, "/window/5/22").await?;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some("/tag/20200601"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert!(String::from_utf8(body.to_vec())?.contains("Found"));
        Ok(())
    }

    #[tokio::test]
    async fn test_window_not_yet_met_redirects_to_previous_tag(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let response = send(state(1), Method::GET, "/window/6/23").await?;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some("/tag/20200525"));
        Ok(())
    }

    #[tokio::test]
    async fn test_daytime_hours() -> Result<(), Box<dyn std::error::Error>> {
        for uri in ["/window/5/09", "/window/5/14"] {
            let response = send(state(1), Method::GET, uri).await?;
            assert_eq!(response.status(), StatusCode::FOUND, "{uri}");
            assert_eq!(location(&response), Some("/tag/20200601"), "{uri}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_image_day_from_state() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(state(0), Method::GET, "/window/2/23").await?;
        assert_eq!(location(&response), Some("/tag/20200531"));
        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_method() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(state(1), Method::POST, "/window/5/22").await?;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        Ok(())
    }

    #[tokio::test]
    async fn test_path_pattern_mismatch_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        for uri in [
            "/window/11/22",
            "/window/7/22",
            "/window/5/29",
            "/window/5/24",
            "/window/5/4",
            "/window/x/22",
        ] {
            let response = send(state(1), Method::GET, uri).await?;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert!(location(&response).is_none(), "{uri}");
        }
        Ok(())
    }
}
