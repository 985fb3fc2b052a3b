/// Builder phase. Wiring mistakes that a later insert would hide are noted
/// here and reported by `build()`.
#[derive(Debug, Default)]
pub struct NotBuilt {
    pub(crate) duplicate_nodes: Vec<String>,
    pub(crate) duplicate_edges: Vec<String>,
}

#[derive(Debug)]
pub struct Built;
