//! Class-struct folding.
//!
//! A record marked as the type struct of a class or interface is removed
//! from the namespace's record list and attached to its owner, keyed by
//! whether it describes the public or the private layout. Folded records
//! stay addressable by name through the namespace's class-struct slots.

use crate::core::naming::split_qualified;
use crate::core::{ClassStructKind, ClassStructSlot, Namespace, Record, RecordKind, SymbolKind};
use crate::resolver::errors::GenError;

/// Fold every class-struct record of `namespace` into its owner.
///
/// Must run before the namespace is indexed.
pub fn fold_class_structs(namespace: &mut Namespace) -> Result<(), GenError> {
    let namespace_name = namespace.name().to_string();
    let records = std::mem::take(&mut namespace.records);
    let mut visible = Vec::with_capacity(records.len());

    for mut record in records {
        let Some(owner) = record.class_struct_for.clone() else {
            visible.push(record);
            continue;
        };

        let label = format!("{}.{}", namespace_name, record.name.native);
        let ambiguous = || GenError::AmbiguousClassStruct {
            record: label.clone(),
            owner: owner.clone(),
        };

        let (qualifier, local) = split_qualified(&owner);
        if qualifier.is_some_and(|q| q != namespace_name) {
            return Err(ambiguous());
        }

        let kind = match record.kind {
            RecordKind::PrivateClass => ClassStructKind::Private,
            _ => ClassStructKind::Public,
        };

        let (owner_kind, owner_index) = if let Some(i) = namespace
            .classes
            .iter()
            .position(|c| c.name.native == local)
        {
            (SymbolKind::Class, i)
        } else if let Some(i) = namespace
            .interfaces
            .iter()
            .position(|i| i.name.native == local)
        {
            (SymbolKind::Interface, i)
        } else {
            return Err(ambiguous());
        };

        let (owner_name, layouts) = match owner_kind {
            SymbolKind::Class => {
                let class = &mut namespace.classes[owner_index];
                (&class.name.managed, &mut class.class_structs)
            }
            _ => {
                let iface = &mut namespace.interfaces[owner_index];
                (&iface.name.managed, &mut iface.class_structs)
            }
        };
        rename(&mut record, owner_name, kind);

        tracing::trace!("Folding {} into {}", record.name.native, owner);
        if layouts.insert(kind, record).is_none() {
            namespace.class_struct_slots.push(ClassStructSlot {
                owner: owner_kind,
                owner_index,
                kind,
            });
        }
    }

    namespace.records = visible;
    Ok(())
}

fn rename(record: &mut Record, owner: &str, kind: ClassStructKind) {
    record.name.managed = format!("{}.Native.{}", owner, kind.identifier());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NamespaceKey;
    use crate::description::RecordDescription;
    use crate::resolver::factory::NamespaceFactory;
    use crate::test_support::fixtures;

    fn namespace_with(records: Vec<RecordDescription>) -> Result<Namespace, GenError> {
        let mut desc = fixtures::repository("Gtk", "3.0", &[]).namespace;
        desc.classes.push(fixtures::class("Widget"));
        desc.interfaces.push(fixtures::interface("Editable"));
        desc.records = records;
        NamespaceFactory::new(NamespaceKey::new("Gtk", "3.0")).create(&desc)
    }

    fn class_struct(name: &str, owner: &str) -> RecordDescription {
        let mut record = fixtures::record(name);
        record.glib_type_struct_for = Some(owner.to_string());
        record
    }

    #[test]
    fn test_public_and_private_fold_into_class() {
        let ns = namespace_with(vec![
            class_struct("WidgetClass", "Widget"),
            class_struct("WidgetClassPrivate", "Widget"),
            fixtures::record("Requisition"),
        ])
        .unwrap();

        assert_eq!(ns.records.len(), 1);
        assert!(ns.lookup("Requisition").is_some());

        let widget = &ns.classes[0];
        let public = &widget.class_structs[&ClassStructKind::Public];
        assert_eq!(public.name.managed, "Widget.Native.ClassStruct");
        let private = &widget.class_structs[&ClassStructKind::Private];
        assert_eq!(private.name.managed, "Widget.Native.PrivateClassStruct");
    }

    #[test]
    fn test_folded_record_stays_addressable() {
        let ns = namespace_with(vec![
            class_struct("WidgetClass", "Widget"),
            class_struct("EditableInterface", "Editable"),
        ])
        .unwrap();

        let (kind, index) = ns.lookup("WidgetClass").unwrap();
        assert_eq!(kind, SymbolKind::ClassStruct);
        let name = ns.symbol_name(kind, index).unwrap();
        assert_eq!(name.native, "WidgetClass");
        assert_eq!(name.managed, "Widget.Native.ClassStruct");
        assert!(!ns.is_reference_type(kind, index));

        let (kind, index) = ns.lookup("EditableInterface").unwrap();
        assert_eq!(
            ns.class_struct(index).unwrap().name.managed,
            "Editable.Native.ClassStruct"
        );
        assert_eq!(kind, SymbolKind::ClassStruct);
    }

    #[test]
    fn test_fold_into_interface() {
        let ns = namespace_with(vec![class_struct("EditableInterface", "Editable")]).unwrap();
        assert!(ns.records.is_empty());
        assert_eq!(
            ns.interfaces[0].class_structs[&ClassStructKind::Public].name.managed,
            "Editable.Native.ClassStruct"
        );
    }

    #[test]
    fn test_owner_outside_namespace() {
        let err = namespace_with(vec![class_struct("ObjectClass", "GObject.Object")]).unwrap_err();
        assert_eq!(
            err,
            GenError::AmbiguousClassStruct {
                record: "Gtk.ObjectClass".to_string(),
                owner: "GObject.Object".to_string(),
            }
        );

        let err = namespace_with(vec![class_struct("MissingClass", "Missing")]).unwrap_err();
        assert!(matches!(err, GenError::AmbiguousClassStruct { .. }));
    }
}
