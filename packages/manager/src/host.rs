use crate::options::ContainerOptions;

/// Opaque reference to an external surface the manager can be mounted on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostNode(String);

impl HostNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// The manager's own surface; renderers attach to it, and it is mounted on
/// at most one host node at a time
#[derive(Debug, Clone)]
pub struct Container {
    id: String,
    width: Option<String>,
    height: Option<String>,
    parent: Option<HostNode>,
}

impl Container {
    pub fn new(options: &ContainerOptions) -> Self {
        Self {
            id: options.id.clone(),
            width: options.width.clone(),
            height: options.height.clone(),
            parent: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn parent(&self) -> Option<&HostNode> {
        self.parent.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn mount(&mut self, node: HostNode) {
        self.parent = Some(node);
    }

    pub(crate) fn unmount(&mut self) -> Option<HostNode> {
        self.parent.take()
    }
}
