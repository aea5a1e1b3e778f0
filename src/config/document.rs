/// Perimeter configuration document and port overrides
///
/// The document is kept as an order-preserving YAML value so that fields this
/// crate does not know about survive a load/patch/dump cycle untouched.
use super::error::ConfigError;
use serde_yaml::{Mapping, Number, Value};
use tracing::debug;

/// Interceptor `type` value identifying the Live Trace dashboard
pub const LIVE_TRACE_INTERCEPTOR: &str = "live_trace";

/// Optional port overrides requested on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortOverrides {
    /// Replaces `server.port`
    pub server_port: Option<u16>,

    /// Replaces `config.server_port` of the live trace interceptor
    pub trace_port: Option<u16>,
}

impl PortOverrides {
    pub fn is_empty(&self) -> bool {
        self.server_port.is_none() && self.trace_port.is_none()
    }
}

/// A loaded perimeter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    /// Parse a document from YAML text without checking its shape
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let root: Value = serde_yaml::from_str(yaml)?;
        Ok(Self { root })
    }

    /// Wrap an already parsed value, checking the root is a mapping
    pub fn from_value(root: Value) -> Result<Self, ConfigError> {
        if !root.is_mapping() {
            return Err(ConfigError::InvalidShape {
                field: "<root>".to_string(),
                expected: "mapping",
            });
        }
        Ok(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Serialize back to YAML, preserving key order
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Current `server.port`, if set to an integer
    pub fn server_port(&self) -> Option<u64> {
        self.root.get("server")?.get("port")?.as_u64()
    }

    /// Current `server_port` of the first live trace interceptor
    pub fn trace_port(&self) -> Option<u64> {
        self.root
            .get("interceptors")?
            .as_sequence()?
            .iter()
            .find(|entry| is_live_trace(entry))?
            .get("config")?
            .get("server_port")?
            .as_u64()
    }

    /// Return a patched copy with the given overrides applied
    ///
    /// `self` is never modified, so a failed override leaves no partial state.
    pub fn with_overrides(&self, overrides: &PortOverrides) -> Result<Self, ConfigError> {
        let mut patched = self.clone();

        if let Some(port) = overrides.server_port {
            patched.set_server_port(port)?;
        }
        if let Some(port) = overrides.trace_port {
            patched.set_trace_port(port)?;
        }

        Ok(patched)
    }

    /// Insert or overwrite `server.port`
    pub fn set_server_port(&mut self, port: u16) -> Result<(), ConfigError> {
        let root = root_mapping(&mut self.root)?;
        let server = child_mapping(root, "server")?;
        server.insert(Value::from("port"), port_value(port));
        debug!("Overrode server.port = {}", port);
        Ok(())
    }

    /// Insert or overwrite `server_port` on the first live trace interceptor
    pub fn set_trace_port(&mut self, port: u16) -> Result<(), ConfigError> {
        let root = root_mapping(&mut self.root)?;
        let interceptors = root
            .entry(Value::from("interceptors"))
            .or_insert(Value::Sequence(Vec::new()));
        if interceptors.is_null() {
            *interceptors = Value::Sequence(Vec::new());
        }
        let interceptors =
            interceptors
                .as_sequence_mut()
                .ok_or_else(|| ConfigError::InvalidShape {
                    field: "interceptors".to_string(),
                    expected: "sequence",
                })?;

        let entry = interceptors
            .iter_mut()
            .find(|entry| is_live_trace(entry))
            .ok_or(ConfigError::TraceInterceptorNotFound)?;
        let entry = entry
            .as_mapping_mut()
            .ok_or_else(|| ConfigError::InvalidShape {
                field: "interceptors[]".to_string(),
                expected: "mapping",
            })?;

        let config = child_mapping(entry, "config")?;
        config.insert(Value::from("server_port"), port_value(port));
        debug!("Overrode {}.config.server_port = {}", LIVE_TRACE_INTERCEPTOR, port);
        Ok(())
    }
}

fn is_live_trace(entry: &Value) -> bool {
    entry.get("type").and_then(Value::as_str) == Some(LIVE_TRACE_INTERCEPTOR)
}

fn port_value(port: u16) -> Value {
    Value::Number(Number::from(u64::from(port)))
}

fn root_mapping(root: &mut Value) -> Result<&mut Mapping, ConfigError> {
    root.as_mapping_mut().ok_or_else(|| ConfigError::InvalidShape {
        field: "<root>".to_string(),
        expected: "mapping",
    })
}

/// Get `parent[key]` as a mapping, creating it when absent or null
fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> Result<&'a mut Mapping, ConfigError> {
    let child = parent
        .entry(Value::from(key))
        .or_insert(Value::Mapping(Mapping::new()));
    if child.is_null() {
        *child = Value::Mapping(Mapping::new());
    }
    child.as_mapping_mut().ok_or_else(|| ConfigError::InvalidShape {
        field: key.to_string(),
        expected: "mapping",
    })
}
