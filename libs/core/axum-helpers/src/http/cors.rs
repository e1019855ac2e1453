use tower_http::cors::CorsLayer;

/// Creates a permissive CORS layer.
///
/// Allows any origin, method, and header. Suitable for public read-mostly
/// APIs where the endpoints are consumed cross-origin without credentials.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
