//! Tests for Node construction, validation and serialization

#[cfg(test)]
mod tests {
    use crate::models::{
        ids, LocalizedText, Node, NodeAttributes, NodeClass, NodeId, QualifiedName, Reference,
        ValidationError, VariableAttributes,
    };
    use serde_json::json;

    fn folder(id: NodeId, name: &str) -> Node {
        let mut node = Node::new(id.clone(), QualifiedName::new(0, name), NodeAttributes::object());
        node.add_reference(Reference::forward(id, ids::HAS_TYPE_DEFINITION, ids::FOLDER_TYPE));
        node
    }

    #[test]
    fn test_new_defaults_display_name_from_browse_name() {
        let node = Node::new(
            ids::OBJECTS_FOLDER,
            QualifiedName::new(0, "Objects"),
            NodeAttributes::object(),
        );
        assert_eq!(node.display_name, LocalizedText::english("Objects"));
        assert!(node.description.is_none());
        assert!(node.references.is_empty());
        assert_eq!(node.node_class(), NodeClass::Object);
    }

    #[test]
    fn test_builder_methods() {
        let node = Node::new(
            ids::SERVER,
            QualifiedName::new(0, "Server"),
            NodeAttributes::object(),
        )
        .with_display_name(LocalizedText::new("de", "Server"))
        .with_description(LocalizedText::english("The server object"));

        assert_eq!(node.display_name.locale.as_deref(), Some("de"));
        assert_eq!(node.description.unwrap().text, "The server object");
    }

    #[test]
    fn test_node_class_follows_attributes() {
        let cases = [
            (NodeAttributes::object(), NodeClass::Object),
            (NodeAttributes::variable(ids::DOUBLE), NodeClass::Variable),
            (NodeAttributes::method(), NodeClass::Method),
            (NodeAttributes::object_type(false), NodeClass::ObjectType),
            (NodeAttributes::data_type(true), NodeClass::DataType),
            (
                NodeAttributes::reference_type(false, false, None),
                NodeClass::ReferenceType,
            ),
        ];

        for (attributes, class) in cases {
            assert_eq!(attributes.node_class(), class);
        }
        assert!(NodeClass::ReferenceType.is_type());
        assert!(!NodeClass::Object.is_type());
        assert_eq!(NodeClass::ReferenceType.mask(), 32);
    }

    #[test]
    fn test_is_abstract_only_for_types() {
        assert_eq!(NodeAttributes::object_type(true).is_abstract(), Some(true));
        assert_eq!(
            NodeAttributes::reference_type(true, false, None).is_abstract(),
            Some(true)
        );
        assert_eq!(NodeAttributes::object().is_abstract(), None);
    }

    #[test]
    fn test_references_of_type() {
        let mut root = folder(ids::ROOT_FOLDER, "Root");
        root.add_references([
            Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::OBJECTS_FOLDER),
            Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::TYPES_FOLDER),
        ]);

        let organizes = ids::ORGANIZES;
        let targets: Vec<_> = root
            .references_of_type(&organizes)
            .map(|r| r.target_id.clone())
            .collect();
        assert_eq!(
            targets,
            vec![ids::OBJECTS_FOLDER.expanded(), ids::TYPES_FOLDER.expanded()]
        );
    }

    #[test]
    fn test_validate_rejects_null_id() {
        let node = Node::new(NodeId::null(), QualifiedName::new(0, "Nothing"), NodeAttributes::object());
        assert_eq!(node.validate(), Err(ValidationError::NullNodeId));
    }

    #[test]
    fn test_validate_rejects_empty_browse_name() {
        let node = Node::new(NodeId::numeric(1, 5), QualifiedName::new(1, ""), NodeAttributes::object());
        assert!(matches!(
            node.validate(),
            Err(ValidationError::EmptyBrowseName(_))
        ));
    }

    #[test]
    fn test_validate_rejects_foreign_reference() {
        let mut node = folder(ids::OBJECTS_FOLDER, "Objects");
        node.add_reference(Reference::forward(ids::ROOT_FOLDER, ids::ORGANIZES, ids::SERVER));

        let err = node.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::ReferenceSourceMismatch {
                node_id: ids::OBJECTS_FOLDER,
                source_id: ids::ROOT_FOLDER,
            }
        );
        assert!(err.to_string().contains("ns=0;i=84"));
    }

    #[test]
    fn test_serialization_flattens_attributes() {
        let node = folder(ids::OBJECTS_FOLDER, "Objects");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["id"], "ns=0;i=85");
        assert_eq!(json["browseName"], "0:Objects");
        assert_eq!(json["nodeClass"], "Object");
        assert_eq!(json["eventNotifier"], 0);
        assert_eq!(json["references"][0]["referenceTypeId"], "ns=0;i=40");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_deserialize_variable_applies_defaults() {
        let node: Node = serde_json::from_value(json!({
            "id": "ns=2;s=Boiler.Temperature",
            "browseName": "2:Temperature",
            "displayName": { "text": "Temperature" },
            "nodeClass": "Variable",
            "dataType": "i=11",
            "value": 21.5
        }))
        .unwrap();

        match &node.attributes {
            NodeAttributes::Variable(VariableAttributes {
                data_type,
                value_rank,
                access_level,
                value,
                ..
            }) => {
                assert_eq!(data_type, &ids::DOUBLE);
                assert_eq!(*value_rank, -1);
                assert_eq!(*access_level, 1);
                assert_eq!(value, &Some(json!(21.5)));
            }
            other => panic!("expected variable attributes, got {:?}", other),
        }
        assert!(node.references.is_empty());
        assert_eq!(node.display_name.locale, None);
    }
}
