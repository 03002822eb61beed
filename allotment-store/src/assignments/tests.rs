// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{AssignedSoftware, AssignmentSource, NewAssignment, SoftwareId, StaffId};

use crate::assert_all_stores;
use crate::assignments::AssignmentStore;

fn staff(id: u64) -> StaffId {
    StaffId::new(id).unwrap()
}

fn software(id: u64) -> SoftwareId {
    SoftwareId::new(id).unwrap()
}

#[tokio::test]
async fn insert_and_query() {
    assert_all_stores!(|store| async {
        let a = store
            .insert_assignment(NewAssignment::new(
                staff(1),
                software(10),
                AssignmentSource::Department,
            ))
            .await
            .unwrap();
        let b = store
            .insert_assignment(NewAssignment::new(
                staff(1),
                software(11),
                AssignmentSource::Manual,
            ))
            .await
            .unwrap();
        let c = store
            .insert_assignment(NewAssignment::new(
                staff(2),
                software(10),
                AssignmentSource::Organization,
            ))
            .await
            .unwrap();

        assert_eq!(store.get_assignment(b.id).await.unwrap(), Some(b.clone()));
        assert_eq!(
            store.assignments_for_staff(staff(1)).await.unwrap(),
            vec![a.clone(), b.clone()]
        );
        assert_eq!(
            store.assignments_for_software(software(10)).await.unwrap(),
            vec![a.clone(), c.clone()]
        );
        assert_eq!(
            store.assigned_software_ids(staff(1)).await.unwrap(),
            vec![software(10), software(11)]
        );
        assert!(store.assigned_software_ids(staff(3)).await.unwrap().is_empty());

        assert_eq!(
            store.find_assignment(staff(2), software(10)).await.unwrap(),
            Some(c.clone())
        );
        assert_eq!(
            store.find_assignment(staff(2), software(11)).await.unwrap(),
            None
        );
    });
}

#[tokio::test]
async fn update_and_delete() {
    assert_all_stores!(|store| async {
        let a = store
            .insert_assignment(NewAssignment::new(
                staff(1),
                software(10),
                AssignmentSource::Team,
            ))
            .await
            .unwrap();

        let manual = AssignedSoftware {
            source: AssignmentSource::Manual,
            ..a.clone()
        };
        assert!(store.update_assignment(&manual).await.unwrap());
        assert_eq!(
            store
                .get_assignment(a.id)
                .await
                .unwrap()
                .map(|assignment| assignment.source),
            Some(AssignmentSource::Manual)
        );

        assert!(store.delete_assignment(a.id).await.unwrap());
        assert!(!store.delete_assignment(a.id).await.unwrap());
        assert!(!store.update_assignment(&manual).await.unwrap());
    });
}

#[tokio::test]
async fn delete_by_source() {
    assert_all_stores!(|store| async {
        for source in [
            AssignmentSource::Department,
            AssignmentSource::Department,
            AssignmentSource::Manual,
        ] {
            store
                .insert_assignment(NewAssignment::new(staff(1), software(10), source))
                .await
                .unwrap();
        }
        let other = store
            .insert_assignment(NewAssignment::new(
                staff(2),
                software(10),
                AssignmentSource::Department,
            ))
            .await
            .unwrap();

        // Only edges with matching staff, software and source are removed.
        assert_eq!(
            store
                .delete_assignments(staff(1), software(10), AssignmentSource::Department)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            store
                .delete_assignments(staff(1), software(10), AssignmentSource::Department)
                .await
                .unwrap(),
            0
        );

        let remaining = store.assignments_for_software(software(10)).await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].source, AssignmentSource::Manual);
        assert_eq!(remaining[1], other);
    });
}
