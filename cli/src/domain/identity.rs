//! Type identities of managed resources and the management paths built from them.
//!
//! Pure functions only: no I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::LifecycleError;

/// Base type every orchestration type derives from.
pub const BTX_SERVICE_TYPE: &str = "Microsoft.BizTalk.XLANGs.BTXEngine.BTXService";

/// CIM namespace of the BizTalk management provider.
pub const BIZTALK_NAMESPACE: &str = r"root\MicrosoftBizTalkServer";

/// Management class of orchestrations.
pub const ORCHESTRATION_CLASS: &str = "MSBTS_Orchestration";

/// Simple-name suffix of satellite resource assemblies.
pub const RESOURCES_SUFFIX: &str = ".resources";

/// Simple-name suffix of serializer assemblies the runtime asks for but which never exist.
pub const XML_SERIALIZERS_SUFFIX: &str = ".XmlSerializers";

// ── Assembly names ───────────────────────────────────────────────────────────

/// Strong name of a .NET assembly, e.g.
/// `Microsoft.BizTalk.Edi.BatchingOrchestration, Version=3.0.1.0, Culture=neutral, PublicKeyToken=31bf3856ad364e35`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssemblyName {
    pub name: String,
    pub version: String,
    /// `None` for the invariant culture.
    pub culture: Option<String>,
    pub public_key_token: Vec<u8>,
}

impl AssemblyName {
    /// Culture as the management provider expects it.
    #[must_use]
    pub fn culture_or_neutral(&self) -> &str {
        self.culture.as_deref().unwrap_or("neutral")
    }

    /// Public key token rendered as lowercase hex (empty when unsigned).
    #[must_use]
    pub fn public_key_token_hex(&self) -> String {
        self.public_key_token
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// `true` for satellite resource assemblies.
    #[must_use]
    pub fn is_resource_assembly(&self) -> bool {
        self.name.ends_with(RESOURCES_SUFFIX)
    }
}

/// Folders probed for assemblies, and which requests are never probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbingPolicy {
    /// Folders probed in order.
    pub paths: Vec<String>,
    pub skip_resources: bool,
}

impl ProbingPolicy {
    /// `true` when a request for `assembly` is answered without probing.
    #[must_use]
    pub fn skips(&self, assembly: &AssemblyName) -> bool {
        (self.skip_resources && assembly.is_resource_assembly())
            || assembly.name.ends_with(XML_SERIALIZERS_SUFFIX)
    }
}

impl FromStr for AssemblyName {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| LifecycleError::InvalidArgument(format!("Invalid assembly name '{s}': {why}"));

        let mut parts = s.split(',').map(str::trim);
        let name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| invalid("missing simple name"))?;

        let mut version = None;
        let mut culture = None;
        let mut token = Vec::new();
        for part in parts {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid("expected Key=Value"))?;
            match key.trim() {
                "Version" => version = Some(parse_version(value.trim()).ok_or_else(|| invalid("malformed version"))?),
                "Culture" => {
                    let value = value.trim();
                    if !value.is_empty() && !value.eq_ignore_ascii_case("neutral") {
                        culture = Some(value.to_string());
                    }
                }
                "PublicKeyToken" => {
                    let value = value.trim();
                    if !value.eq_ignore_ascii_case("null") {
                        token = parse_hex(value).ok_or_else(|| invalid("malformed public key token"))?;
                    }
                }
                // ProcessorArchitecture and friends do not take part in addressing.
                _ => {}
            }
        }

        Ok(Self {
            name: name.to_string(),
            version: version.ok_or_else(|| invalid("missing Version"))?,
            culture,
            public_key_token: token,
        })
    }
}

impl TryFrom<String> for AssemblyName {
    type Error = LifecycleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssemblyName> for String {
    fn from(value: AssemblyName) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AssemblyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.public_key_token.is_empty() {
            "null".to_string()
        } else {
            self.public_key_token_hex()
        };
        write!(
            f,
            "{}, Version={}, Culture={}, PublicKeyToken={token}",
            self.name,
            self.version,
            self.culture_or_neutral()
        )
    }
}

fn parse_version(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.split('.').collect();
    let well_formed = (2..=4).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    well_formed.then(|| value.to_string())
}

fn parse_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 || !value.is_ascii() {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&value[i..i + 2], 16).ok())
        .collect()
}

// ── Type descriptors ─────────────────────────────────────────────────────────

/// Static description of a loaded type, as reported by reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub full_name: String,
    pub assembly: AssemblyName,
    /// Base-type chain, nearest first.
    #[serde(default)]
    pub base_types: Vec<String>,
}

impl TypeDescriptor {
    /// Whether the type satisfies the orchestration capability contract.
    #[must_use]
    pub fn is_orchestration(&self) -> bool {
        self.base_types.iter().any(|t| t == BTX_SERVICE_TYPE)
    }
}

/// An orchestration type; only constructible from a descriptor that derives from `BTXService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationType {
    full_name: String,
    assembly: AssemblyName,
}

impl OrchestrationType {
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn assembly(&self) -> &AssemblyName {
        &self.assembly
    }

    /// Address of this orchestration's `MSBTS_Orchestration` instance on `computer`.
    #[must_use]
    pub fn management_path(&self, computer: &str) -> ManagementPath {
        ManagementPath {
            computer: computer.to_string(),
            namespace: BIZTALK_NAMESPACE,
            class: ORCHESTRATION_CLASS,
            keys: vec![
                ("AssemblyCulture", self.assembly.culture_or_neutral().to_string()),
                ("AssemblyName", self.assembly.name.clone()),
                ("AssemblyPublicKeyToken", self.assembly.public_key_token_hex()),
                ("AssemblyVersion", self.assembly.version.clone()),
                ("Name", self.full_name.clone()),
            ],
        }
    }
}

impl TryFrom<TypeDescriptor> for OrchestrationType {
    type Error = LifecycleError;

    fn try_from(descriptor: TypeDescriptor) -> Result<Self, Self::Error> {
        if !descriptor.is_orchestration() {
            return Err(LifecycleError::InvalidArgument(format!(
                "Type '{}' is not a BTXService-derived orchestration type.",
                descriptor.full_name
            )));
        }
        Ok(Self {
            full_name: descriptor.full_name,
            assembly: descriptor.assembly,
        })
    }
}

impl fmt::Display for OrchestrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

// ── Management paths ─────────────────────────────────────────────────────────

/// Address of one management object: namespace, class and key properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementPath {
    pub computer: String,
    pub namespace: &'static str,
    pub class: &'static str,
    pub keys: Vec<(&'static str, String)>,
}

impl ManagementPath {
    /// WQL filter selecting the instance by its keys.
    #[must_use]
    pub fn filter(&self) -> String {
        self.keys
            .iter()
            .map(|(k, v)| format!("{k}='{}'", escape_wql(v)))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

impl fmt::Display for ManagementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r"\\{}\{}:{}.", self.computer, self.namespace, self.class)?;
        for (i, (key, value)) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}='{value}'")?;
        }
        Ok(())
    }
}

fn escape_wql(value: &str) -> String {
    value.replace('\\', r"\\").replace('\'', r"\'")
}
