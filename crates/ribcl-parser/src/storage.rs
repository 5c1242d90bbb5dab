//! Typed views of storage and backplane data, projected from parsed trees
//! with path queries.
#[cfg(feature = "json")]
use serde::Serialize;

use crate::node::Node;

/// `VALUE` attribute of the node reached from `node` by `path`.
fn value(node: &Node, path: &str) -> Option<String> {
    node.find(path)
        .and_then(|child| child.get("VALUE"))
        .map(str::to_string)
}

#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSummary {
    pub controllers: Vec<Controller>,
    pub discovery_status: Option<String>,
}

impl StorageSummary {
    /// Collects every controller under every `STORAGE` node of `roots`.
    pub fn from_roots(roots: &[Node]) -> Self {
        let mut summary = StorageSummary::default();

        for storage in roots.iter().flat_map(|root| root.find_all(".//STORAGE")) {
            summary.controllers.extend(
                storage
                    .find_all(".//CONTROLLER")
                    .into_iter()
                    .map(Controller::from_node),
            );

            if summary.discovery_status.is_none() {
                summary.discovery_status = value(storage, "DISCOVERY_STATUS/STATUS");
            }
        }

        summary
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty() && self.discovery_status.is_none()
    }

    pub fn controller(&self, model: &str) -> Option<&Controller> {
        self.controllers
            .iter()
            .find(|controller| controller.model.as_deref() == Some(model))
    }
}

#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controller {
    pub label: Option<String>,
    pub status: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub firmware_version: Option<String>,
    pub drive_enclosures: Vec<DriveEnclosure>,
    pub logical_drives: Vec<LogicalDrive>,
}

impl Controller {
    pub fn from_node(node: &Node) -> Self {
        Controller {
            label: value(node, "LABEL"),
            status: value(node, "STATUS"),
            model: value(node, "MODEL"),
            serial_number: value(node, "SERIAL_NUMBER"),
            firmware_version: value(node, "FW_VERSION"),
            drive_enclosures: node
                .find_all(".//DRIVE_ENCLOSURE")
                .into_iter()
                .map(DriveEnclosure::from_node)
                .collect(),
            logical_drives: node
                .find_all(".//LOGICAL_DRIVE")
                .into_iter()
                .map(LogicalDrive::from_node)
                .collect(),
        }
    }

    /// Physical drives of every logical drive, in document order.
    pub fn physical_drives(&self) -> impl Iterator<Item = &PhysicalDrive> {
        self.logical_drives
            .iter()
            .flat_map(|drive| drive.physical_drives.iter())
    }
}

#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveEnclosure {
    pub label: Option<String>,
    pub status: Option<String>,
    pub drive_bay: Option<String>,
}

impl DriveEnclosure {
    pub fn from_node(node: &Node) -> Self {
        DriveEnclosure {
            label: value(node, "LABEL"),
            status: value(node, "STATUS"),
            drive_bay: value(node, "DRIVE_BAY"),
        }
    }
}

#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalDrive {
    pub label: Option<String>,
    pub status: Option<String>,
    pub capacity: Option<String>,
    pub fault_tolerance: Option<String>,
    pub logical_drive_type: Option<String>,
    pub physical_drives: Vec<PhysicalDrive>,
}

impl LogicalDrive {
    pub fn from_node(node: &Node) -> Self {
        LogicalDrive {
            label: value(node, "LABEL"),
            status: value(node, "STATUS"),
            capacity: value(node, "CAPACITY"),
            fault_tolerance: value(node, "FAULT_TOLERANCE"),
            logical_drive_type: value(node, "LOGICAL_DRIVE_TYPE"),
            physical_drives: node
                .find_all(".//PHYSICAL_DRIVE")
                .into_iter()
                .map(PhysicalDrive::from_node)
                .collect(),
        }
    }
}

#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhysicalDrive {
    pub label: Option<String>,
    pub status: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub capacity: Option<String>,
    pub location: Option<String>,
    pub firmware_version: Option<String>,
}

impl PhysicalDrive {
    pub fn from_node(node: &Node) -> Self {
        PhysicalDrive {
            label: value(node, "LABEL"),
            status: value(node, "STATUS"),
            serial_number: value(node, "SERIAL_NUMBER"),
            model: value(node, "MODEL"),
            capacity: value(node, "CAPACITY"),
            location: value(node, "LOCATION"),
            firmware_version: value(node, "FW_VERSION"),
        }
    }
}

#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backplane {
    pub type_id: Option<String>,
    pub sep_node_id: Option<String>,
    pub wwid: Option<String>,
    pub sep_id: Option<String>,
    pub backplane_name: Option<String>,
    pub fw_rev: Option<String>,
    pub bay_count: Option<String>,
    pub start_bay: Option<String>,
    pub host_port_count: Option<String>,
    pub host_ports: Vec<HostPort>,
}

impl Backplane {
    /// Projects the first `READ_BACKPLANE_INFO` node found in `roots`.
    pub fn from_roots(roots: &[Node]) -> Option<Self> {
        roots
            .iter()
            .find_map(|root| root.find(".//READ_BACKPLANE_INFO"))
            .map(Backplane::from_node)
    }

    pub fn from_node(node: &Node) -> Self {
        Backplane {
            type_id: value(node, "TYPE_ID"),
            sep_node_id: value(node, "SEP_NODE_ID"),
            wwid: value(node, "WWID"),
            sep_id: value(node, "SEP_ID"),
            backplane_name: value(node, "BACKPLANE_NAME"),
            fw_rev: value(node, "FW_REV"),
            bay_count: value(node, "BAY_CNT"),
            start_bay: value(node, "START_BAY"),
            host_port_count: value(node, "HOST_PORT_CNT"),
            host_ports: node
                .find_all(".//HOST_PORT")
                .into_iter()
                .map(|port| HostPort {
                    value: port.get("VALUE").map(str::to_string),
                    node_num: value(port, "NODE_NUM"),
                    slot_num: value(port, "SLOT_NUM"),
                })
                .collect(),
        }
    }
}

#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPort {
    pub value: Option<String>,
    pub node_num: Option<String>,
    pub slot_num: Option<String>,
}
