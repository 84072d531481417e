//! Define our own macro to simplify the code
//!

/// Call the HTTP client with the proper arguments
///
/// - unauth call submitting a JSON body, returns the pending request future
///
#[macro_export]
macro_rules! http_post {
    ($self:ident, $url:ident, $data:expr) => {
        $self
            .client
            .post($url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .header("content-type", "application/json")
            .json($data)
            .send()
    };
}
