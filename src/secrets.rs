//! Secret reference resolution for resource properties.
//!
//! Resource property values may carry dynamic reference tokens of the form
//! `{{resolve:secretsmanager:<reference>}}`. Before dispatching to a user
//! handler, the router walks the property map recursively and replaces each
//! token with the resolved plaintext, so handlers never see a raw
//! reference. Resolution failure is fatal to the session: silently passing
//! a literal token through would hand the handler a credential-shaped
//! string that is not a credential.

use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::HandlerError;

/// A string value is a secret reference only when the token spans the whole
/// value, matching CloudFormation's dynamic reference semantics. Partial
/// tokens embedded in a longer string are left untouched.
static SECRET_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{resolve:secretsmanager:(.+)\}\}$")
        .expect("secret reference pattern is valid")
});

/// Extracts the reference body from a secret token, if the value is one.
///
/// Returns the text between `{{resolve:secretsmanager:` and the closing
/// braces, or `None` when the value is not a whole-string reference.
pub fn secret_reference(value: &str) -> Option<&str> {
    SECRET_REFERENCE
        .captures(value)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Resolves a secret reference body to its plaintext value.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Resolves `reference` (the token body after `secretsmanager:`) to the
    /// secret plaintext.
    async fn resolve(&self, reference: &str) -> Result<String, HandlerError>;
}

/// Replaces every secret reference token in `properties` with its resolved
/// plaintext, in place.
///
/// The walk covers nested objects and arrays. The first resolution failure
/// aborts the walk and is propagated as a terminal error.
pub async fn resolve_properties(
    properties: &mut Map<String, Value>,
    resolver: &dyn SecretResolver,
) -> Result<(), HandlerError> {
    for (_key, value) in properties.iter_mut() {
        resolve_value(value, resolver).await?;
    }
    Ok(())
}

fn resolve_value<'a>(
    value: &'a mut Value,
    resolver: &'a dyn SecretResolver,
) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>> {
    Box::pin(async move {
        match value {
            Value::String(s) => {
                let reference = secret_reference(s).map(str::to_owned);
                if let Some(reference) = reference {
                    let plaintext = resolver.resolve(&reference).await?;
                    *value = Value::String(plaintext);
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    resolve_value(item, resolver).await?;
                }
            }
            Value::Object(map) => {
                for (_key, nested) in map.iter_mut() {
                    resolve_value(nested, resolver).await?;
                }
            }
            _ => {}
        }
        Ok(())
    })
}

/// Parsed form of a secret reference body.
///
/// CloudFormation's grammar is
/// `secret-id:secret-string:json-key:version-stage:version-id`, where every
/// segment after the secret id is optional and the secret id may itself be
/// a full ARN (which contains six colons of its own).
#[derive(Debug, Clone, PartialEq, Eq)]
struct SecretReferenceParts {
    secret_id: String,
    json_key: Option<String>,
    version_stage: Option<String>,
    version_id: Option<String>,
}

fn parse_reference(reference: &str) -> SecretReferenceParts {
    let (secret_id, rest) = split_secret_id(reference);
    let mut segments = rest.map(|r| r.split(':')).into_iter().flatten();
    // First segment after the id is the literal "SecretString" selector.
    let _selector = segments.next();
    let non_empty = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    };
    SecretReferenceParts {
        secret_id: secret_id.to_string(),
        json_key: segments.next().and_then(|s| non_empty(s)),
        version_stage: segments.next().and_then(|s| non_empty(s)),
        version_id: segments.next().and_then(|s| non_empty(s)),
    }
}

/// Splits the secret id off the front of the reference body.
///
/// A full secret ARN contains exactly six colons
/// (`arn:partition:service:region:account:secret:name`), so for ARN ids the
/// split happens at the seventh colon if one exists.
fn split_secret_id(reference: &str) -> (&str, Option<&str>) {
    if reference.starts_with("arn:") {
        let mut colons = 0;
        for (index, ch) in reference.char_indices() {
            if ch == ':' {
                colons += 1;
                if colons == 7 {
                    return (&reference[..index], Some(&reference[index + 1..]));
                }
            }
        }
        (reference, None)
    } else {
        match reference.split_once(':') {
            Some((id, rest)) => (id, Some(rest)),
            None => (reference, None),
        }
    }
}

/// [`SecretResolver`] backed by AWS Secrets Manager.
pub struct SecretsManagerResolver {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerResolver {
    /// Creates a resolver from an existing Secrets Manager client.
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    /// Creates a resolver from the ambient AWS configuration.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_secretsmanager::Client::new(&config))
    }
}

#[async_trait]
impl SecretResolver for SecretsManagerResolver {
    async fn resolve(&self, reference: &str) -> Result<String, HandlerError> {
        let parts = parse_reference(reference);

        let mut request = self.client.get_secret_value().secret_id(&parts.secret_id);
        if let Some(stage) = &parts.version_stage {
            request = request.version_stage(stage);
        }
        if let Some(version_id) = &parts.version_id {
            request = request.version_id(version_id);
        }

        let output = request
            .send()
            .await
            .map_err(|e| HandlerError::secret_resolution(reference, e.to_string()))?;

        let secret_string = output.secret_string().ok_or_else(|| {
            HandlerError::secret_resolution(reference, "secret has no string value")
        })?;

        match &parts.json_key {
            None => Ok(secret_string.to_string()),
            Some(key) => {
                let parsed: Value = serde_json::from_str(secret_string).map_err(|e| {
                    HandlerError::secret_resolution(
                        reference,
                        format!("secret value is not JSON but a json-key was requested: {e}"),
                    )
                })?;
                match parsed.get(key) {
                    Some(Value::String(s)) => Ok(s.clone()),
                    Some(other) => Ok(other.to_string()),
                    None => Err(HandlerError::secret_resolution(
                        reference,
                        format!("secret value has no key '{key}'"),
                    )),
                }
            }
        }
    }
}
