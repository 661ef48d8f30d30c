use serde::Deserialize;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    // Defaults to the next free slot in declaration order.
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub plant: Option<bool>,
    #[serde(default)]
    pub transparent: Option<bool>,
    #[serde(default)]
    pub liquid: Option<bool>,
    #[serde(default)]
    pub materials: Option<MaterialsDef>,
}

// Materials mapping: `all` is the fallback for any direction left unset
#[derive(Deserialize, Debug, Clone, Default)]
pub struct MaterialsDef {
    #[serde(default)]
    pub all: Option<String>,
    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub bottom: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}
