// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{
    Actor, AssignmentAction, AssignmentLog, NewAssignmentLog, SoftwareId, StaffId,
};

use crate::assert_all_stores;
use crate::logs::{AuditLogStore, LogQuery};

fn entry(staff: u64, software: u64, action: AssignmentAction) -> NewAssignmentLog {
    NewAssignmentLog {
        staff_id: StaffId::new(staff).unwrap(),
        software_id: SoftwareId::new(software).unwrap(),
        action,
        changed_by: Actor::System,
    }
}

#[tokio::test]
async fn append_and_query() {
    assert_all_stores!(|store| async {
        let first = store
            .append_log(entry(1, 10, AssignmentAction::Assigned))
            .await
            .unwrap();
        let second = store
            .append_log(entry(1, 11, AssignmentAction::Assigned))
            .await
            .unwrap();
        let third = store
            .append_log(entry(2, 10, AssignmentAction::Assigned))
            .await
            .unwrap();
        let fourth = store
            .append_log(NewAssignmentLog {
                changed_by: Actor::User(7),
                ..entry(1, 10, AssignmentAction::Unassigned)
            })
            .await
            .unwrap();

        assert_eq!(first.changed_by, Actor::System);
        assert_eq!(store.get_log(fourth.id).await.unwrap(), Some(fourth.clone()));

        let ids = |entries: Vec<AssignmentLog>| {
            entries.into_iter().map(|entry| entry.id).collect::<Vec<_>>()
        };

        // Newest first.
        assert_eq!(
            ids(store.logs(&LogQuery::new()).await.unwrap()),
            vec![fourth.id, third.id, second.id, first.id]
        );

        assert_eq!(
            ids(store
                .logs(&LogQuery::new().staff(StaffId::new(1).unwrap()))
                .await
                .unwrap()),
            vec![fourth.id, second.id, first.id]
        );
        assert_eq!(
            ids(store
                .logs(
                    &LogQuery::new()
                        .software(SoftwareId::new(10).unwrap())
                        .action(AssignmentAction::Assigned)
                )
                .await
                .unwrap()),
            vec![third.id, first.id]
        );

        // Pagination.
        assert_eq!(
            ids(store
                .logs(&LogQuery::new().limit(2).offset(1))
                .await
                .unwrap()),
            vec![third.id, second.id]
        );
        assert!(
            store
                .logs(&LogQuery::new().offset(4))
                .await
                .unwrap()
                .is_empty()
        );
    });
}

#[tokio::test]
async fn corrections() {
    assert_all_stores!(|store| async {
        let entry = store
            .append_log(entry(1, 10, AssignmentAction::Assigned))
            .await
            .unwrap();

        let corrected = AssignmentLog {
            action: AssignmentAction::Unassigned,
            changed_by: Actor::User(3),
            ..entry.clone()
        };
        assert!(store.update_log(&corrected).await.unwrap());

        let stored = store.get_log(entry.id).await.unwrap().unwrap();
        assert_eq!(stored.action, AssignmentAction::Unassigned);
        assert_eq!(stored.changed_by, Actor::User(3));
        assert_eq!(stored.changed_at, entry.changed_at);

        assert!(store.delete_log(entry.id).await.unwrap());
        assert!(!store.delete_log(entry.id).await.unwrap());
        assert!(!store.update_log(&corrected).await.unwrap());
    });
}
