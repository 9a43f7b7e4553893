/// Document region the parser is currently inside.
///
/// Phases are pushed only when a start tag matches a recognized transition
/// from the phase on top of the stack, and popped by the end tag of that same
/// element. Unrecognized elements push nothing, so their subtrees are walked
/// but ignored unless a descendant itself matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParsePhase {
    /// Inside the file group holding page text.
    OcrFileGrp,
    /// Inside one `file` descriptor of that group.
    File,
    /// Inside the descriptor's `FLocat`.
    FLocat,
    /// Inside the physical `structMap`.
    StructMap,
    /// Inside the top-level `div` of type `volume`.
    VolumeDiv,
    /// Inside a `div` of type `page`.
    PageDiv,
    /// Inside a page's `fptr` to a tracked file.
    OcrFptr,
}

/// Attributes of the page division currently being read, held until its
/// file pointer names the page they belong to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PageDivision {
    pub order: u32,
    pub label: Option<String>,
    pub order_label: Option<String>,
}
