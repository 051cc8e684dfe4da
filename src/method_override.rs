use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

/// HTML forms can only POST; `?_method=PUT|DELETE` on a POST switches
/// the method before routing.
pub async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        if let Some(method) = request.uri().query().and_then(overridden_method) {
            *request.method_mut() = method;
        }
    }
    next.run(request).await
}

fn overridden_method(query: &str) -> Option<Method> {
    let (_, value) = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "_method")?;

    match value.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overridden_method() {
        assert_eq!(overridden_method("_method=DELETE"), Some(Method::DELETE));
        assert_eq!(overridden_method("page=2&_method=put"), Some(Method::PUT));
        assert_eq!(overridden_method("_method=GET"), None);
        assert_eq!(overridden_method("_method=PATCH"), None);
        assert_eq!(overridden_method("method=DELETE"), None);
        assert_eq!(overridden_method(""), None);
    }
}
