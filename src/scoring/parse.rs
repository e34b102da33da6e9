use serde::Deserialize;
use serde_json::Value;

use super::types::ScoringBackendResponse;

#[derive(Debug, Deserialize)]
struct ReplyBody {
    #[serde(alias = "points", alias = "grade")]
    score: Value,
    #[serde(default, alias = "feedback", alias = "reason", alias = "explanation")]
    rationale: Option<String>,
    #[serde(default, alias = "max_score", alias = "maxPoints", alias = "max_points", alias = "outOf")]
    max_score: Option<Value>,
}

/// Pulls the JSON object out of a model reply.
///
/// Tries a fenced ```json block, then any fenced block, then the span from the
/// first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            return Some(body[..end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let body = &text[start + 3..];
        if let Some(end) = body.find("```") {
            let inner = body[..end].trim();
            if inner.starts_with('{') {
                return Some(inner);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a model reply into a score on the `[0, max_points]` scale.
///
/// Accepts numeric strings and `"a/b"` fractions. When the reply states its own
/// scale (`maxScore`, or the `b` of a fraction) the score is rescaled to
/// `max_points`. The returned score is not clamped.
pub fn parse_reply(text: &str, max_points: f64) -> Result<ScoringBackendResponse, String> {
    let json = extract_json(text).ok_or_else(|| "reply contains no JSON object".to_string())?;
    let body: ReplyBody =
        serde_json::from_str(json).map_err(|e| format!("malformed reply JSON: {}", e))?;

    let (mut score, fraction_scale) = numeric_score(&body.score)?;
    if !score.is_finite() {
        return Err("score is not a finite number".to_string());
    }

    let rationale = body
        .rationale
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| "reply has no rationale".to_string())?;

    let stated_scale = match body.max_score.as_ref() {
        Some(value) => Some(numeric_score(value)?.0),
        None => fraction_scale,
    };

    if let Some(scale) = stated_scale {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(format!("reply states an invalid scale: {}", scale));
        }
        if (scale - max_points).abs() > 1e-9 {
            score = score / scale * max_points;
        }
    }

    Ok(ScoringBackendResponse::new(score, rationale))
}

/// Reads a score from a JSON number, a numeric string or an `"a/b"` string.
/// Returns the value and, for fractions, the stated denominator.
fn numeric_score(value: &Value) -> Result<(f64, Option<f64>), String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(|v| (v, None))
            .ok_or_else(|| format!("score {} is not representable", n)),
        Value::String(s) => {
            let s = s.trim();
            if let Some((num, den)) = s.split_once('/') {
                let num = parse_number(num)?;
                let den = parse_number(den)?;
                return Ok((num, Some(den)));
            }
            parse_number(s).map(|v| (v, None))
        }
        other => Err(format!("score has unsupported type: {}", other)),
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", s.trim()))
}
