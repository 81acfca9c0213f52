use reqwest::{Client, Url};

use crate::error::{SourceError, truncate_body};

/// Parse a configured base URL, rejecting anything that can't take path segments.
pub(crate) fn parse_base_url(base: &str) -> Result<Url, SourceError> {
    let url = Url::parse(base).map_err(|_| SourceError::InvalidUrl(base.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(SourceError::InvalidUrl(base.to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`. Each segment is percent-escaped on its own,
/// so a `/` inside a segment does not introduce a new path level.
pub(crate) fn join_segments<'a, I>(base: &Url, segments: I) -> Result<Url, SourceError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SourceError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Issue one GET and return the body of a 2xx response.
///
/// Dropping the returned future aborts the request.
pub(crate) async fn get_body(http: &Client, url: &Url) -> Result<String, SourceError> {
    tracing::debug!(%url, "sending request");

    let res = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| SourceError::network(url, e))?;

    let status = res.status();
    if !status.is_success() {
        tracing::warn!(%url, %status, "request failed");
        // The status is the error; a body that fails to arrive doesn't change that.
        let body = res.text().await.unwrap_or_default();
        return Err(SourceError::Http {
            url: url.to_string(),
            status,
            body: truncate_body(&body),
        });
    }

    let body = res.text().await.map_err(|e| SourceError::network(url, e))?;
    tracing::debug!(%url, %status, bytes = body.len(), "received response");
    Ok(body)
}
