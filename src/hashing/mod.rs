use blake3::Hasher;

use crate::request::GradingRequest;

/// Stable fingerprint of a validated grading request.
///
/// Fields are length-prefixed so that moving text between fields changes the
/// fingerprint. `max_points` is hashed by bit pattern. The BLAKE3 digest is
/// truncated to its first 64 bits; it is only used to correlate log lines.
pub fn fingerprint_request(request: &GradingRequest) -> u64 {
    let mut hasher = Hasher::new();
    update_field(&mut hasher, request.question().as_bytes());
    update_field(&mut hasher, request.student_answer().as_bytes());
    match request.correct_answer() {
        Some(answer) => {
            hasher.update(&[1]);
            update_field(&mut hasher, answer.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
    hasher.update(&request.max_points().to_bits().to_le_bytes());
    hasher.update(request.question_type().as_str().as_bytes());

    truncate(&hasher.finalize())
}

/// Hex form of [`fingerprint_request`], as recorded in tracing spans.
pub fn fingerprint_hex(request: &GradingRequest) -> String {
    format!("{:016x}", fingerprint_request(request))
}

fn truncate(hash: &blake3::Hash) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn update_field(hasher: &mut Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
