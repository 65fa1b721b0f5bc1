use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}
