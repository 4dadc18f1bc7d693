//! Well-known identifiers of the standard namespace (namespace index 0)

use super::node_id::NodeId;

// Reference types
pub const REFERENCES: NodeId = NodeId::numeric(0, 31);
pub const NON_HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 32);
pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 33);
pub const HAS_CHILD: NodeId = NodeId::numeric(0, 34);
pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);
pub const HAS_EVENT_SOURCE: NodeId = NodeId::numeric(0, 36);
pub const HAS_MODELLING_RULE: NodeId = NodeId::numeric(0, 37);
pub const HAS_ENCODING: NodeId = NodeId::numeric(0, 38);
pub const HAS_DESCRIPTION: NodeId = NodeId::numeric(0, 39);
pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
pub const GENERATES_EVENT: NodeId = NodeId::numeric(0, 41);
pub const AGGREGATES: NodeId = NodeId::numeric(0, 44);
pub const HAS_SUBTYPE: NodeId = NodeId::numeric(0, 45);
pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);
pub const HAS_NOTIFIER: NodeId = NodeId::numeric(0, 48);
pub const HAS_ORDERED_COMPONENT: NodeId = NodeId::numeric(0, 49);

// Object and variable types
pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);
pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);
pub const BASE_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 62);
pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);
pub const PROPERTY_TYPE: NodeId = NodeId::numeric(0, 68);
pub const DATA_TYPE_ENCODING_TYPE: NodeId = NodeId::numeric(0, 76);
pub const MODELLING_RULE_TYPE: NodeId = NodeId::numeric(0, 77);
pub const SERVER_TYPE: NodeId = NodeId::numeric(0, 2004);

// Modelling rules
pub const MODELLING_RULE_MANDATORY: NodeId = NodeId::numeric(0, 78);
pub const MODELLING_RULE_OPTIONAL: NodeId = NodeId::numeric(0, 80);

// Folders and well-known instances
pub const ROOT_FOLDER: NodeId = NodeId::numeric(0, 84);
pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);
pub const TYPES_FOLDER: NodeId = NodeId::numeric(0, 86);
pub const VIEWS_FOLDER: NodeId = NodeId::numeric(0, 87);
pub const OBJECT_TYPES_FOLDER: NodeId = NodeId::numeric(0, 88);
pub const VARIABLE_TYPES_FOLDER: NodeId = NodeId::numeric(0, 89);
pub const DATA_TYPES_FOLDER: NodeId = NodeId::numeric(0, 90);
pub const REFERENCE_TYPES_FOLDER: NodeId = NodeId::numeric(0, 91);
pub const SERVER: NodeId = NodeId::numeric(0, 2253);

// Data types
pub const BOOLEAN: NodeId = NodeId::numeric(0, 1);
pub const INT32: NodeId = NodeId::numeric(0, 6);
pub const UINT32: NodeId = NodeId::numeric(0, 7);
pub const DOUBLE: NodeId = NodeId::numeric(0, 11);
pub const STRING: NodeId = NodeId::numeric(0, 12);
pub const DATE_TIME: NodeId = NodeId::numeric(0, 13);
pub const LOCALIZED_TEXT: NodeId = NodeId::numeric(0, 21);
pub const STRUCTURE: NodeId = NodeId::numeric(0, 22);
pub const BASE_DATA_TYPE: NodeId = NodeId::numeric(0, 24);
pub const NUMBER: NodeId = NodeId::numeric(0, 26);
pub const ARGUMENT: NodeId = NodeId::numeric(0, 296);
pub const RANGE: NodeId = NodeId::numeric(0, 884);
pub const EU_INFORMATION: NodeId = NodeId::numeric(0, 887);
