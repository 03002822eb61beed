// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use allotment_core::{
    AssignmentAction, AssignmentSource, DepartmentId, MatchScope, Membership, NewAssignment,
    NewSoftware, NewStaff, SoftwareId, Staff, StaffStatus, TeamId,
};
use allotment_store::{
    AssignmentStore, AuditLogStore, LogQuery, MatchStore, SoftwareStore, StaffStore,
    assert_all_stores,
};
use assert_matches::assert_matches;

use crate::test_utils::{FaultyStore, InjectedError};
use crate::{
    EngineError, EngineStore, Stage, auto_assign, revoke_all, revoke_from_source,
    revoke_software, rule_created, rule_deleted, sync_staff,
};

fn department(id: u64) -> DepartmentId {
    DepartmentId::new(id).unwrap()
}

fn team(id: u64) -> TeamId {
    TeamId::new(id).unwrap()
}

async fn add_staff<S, E>(store: &S, email: &str, membership: Membership) -> Staff
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    store
        .insert_staff(NewStaff {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            department_id: membership.department_id,
            team_id: membership.team_id,
            status: StaffStatus::Active,
        })
        .await
        .unwrap()
        .expect("unique email")
}

async fn add_software<S, E>(store: &S, name: &str) -> SoftwareId
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    store
        .insert_software(NewSoftware {
            name: name.to_string(),
            description: String::new(),
            kind: "license".to_string(),
        })
        .await
        .unwrap()
        .expect("unique name")
        .id
}

async fn add_rule<S, E>(store: &S, software_id: SoftwareId, scope: MatchScope)
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    store
        .insert_match(software_id, scope)
        .await
        .unwrap()
        .expect("unique rule");
}

/// Software held by a staff member together with the source of each edge.
async fn holdings<S, E>(store: &S, staff: &Staff) -> HashMap<SoftwareId, AssignmentSource>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    store
        .assignments_for_staff(staff.id)
        .await
        .unwrap()
        .into_iter()
        .map(|assignment| (assignment.software_id, assignment.source))
        .collect()
}

async fn log_count<S, E>(store: &S, query: LogQuery) -> usize
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    store.logs(&query).await.unwrap().len()
}

#[tokio::test]
async fn auto_assign_is_idempotent() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(Some(department(1)), Some(team(2)));
        let staff = add_staff(&store, "grace@example.org", membership).await;

        let editor = add_software(&store, "Editor").await;
        let chat = add_software(&store, "Chat").await;
        let mail = add_software(&store, "Mail").await;
        add_rule(&store, editor, MatchScope::Department(department(1))).await;
        add_rule(&store, chat, MatchScope::Team(team(2))).await;
        add_rule(&store, mail, MatchScope::Organization).await;

        let report = auto_assign(&store, staff.id, membership).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.assigned(), 3);

        let first = holdings(&store, &staff).await;
        assert_eq!(
            first,
            HashMap::from([
                (editor, AssignmentSource::Department),
                (chat, AssignmentSource::Team),
                (mail, AssignmentSource::Organization),
            ])
        );
        assert_eq!(log_count(&store, LogQuery::new().staff(staff.id)).await, 3);

        // Second run changes nothing and writes no logs.
        let report = auto_assign(&store, staff.id, membership).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(holdings(&store, &staff).await, first);
        assert_eq!(log_count(&store, LogQuery::new().staff(staff.id)).await, 3);
    });
}

#[tokio::test]
async fn department_wins_on_first_assignment() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(Some(department(1)), Some(team(2)));
        let staff = add_staff(&store, "grace@example.org", membership).await;

        let editor = add_software(&store, "Editor").await;
        add_rule(&store, editor, MatchScope::Organization).await;
        add_rule(&store, editor, MatchScope::Team(team(2))).await;
        add_rule(&store, editor, MatchScope::Department(department(1))).await;

        let report = auto_assign(&store, staff.id, membership).await.unwrap();
        assert_eq!(report.assigned(), 1);

        let assignments = store.assignments_for_staff(staff.id).await.unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].source, AssignmentSource::Department);
    });
}

#[tokio::test]
async fn existing_edges_are_not_retagged() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(Some(department(1)), None);
        let staff = add_staff(&store, "grace@example.org", membership).await;
        let editor = add_software(&store, "Editor").await;

        // Staff already holds the software through the organization.
        store
            .insert_assignment(NewAssignment::new(
                staff.id,
                editor,
                AssignmentSource::Organization,
            ))
            .await
            .unwrap();
        add_rule(&store, editor, MatchScope::Department(department(1))).await;

        let report = auto_assign(&store, staff.id, membership).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([(editor, AssignmentSource::Organization)])
        );
    });
}

#[tokio::test]
async fn sync_revokes_both_former_units() {
    assert_all_stores!(|store| async {
        let old = Membership::new(Some(department(1)), Some(team(5)));
        let new = Membership::new(Some(department(2)), Some(team(5)));
        let staff = add_staff(&store, "grace@example.org", old).await;

        let x = add_software(&store, "X").await;
        let y = add_software(&store, "Y").await;
        let z = add_software(&store, "Z").await;
        let t = add_software(&store, "T").await;
        add_rule(&store, x, MatchScope::Department(department(1))).await;
        add_rule(&store, y, MatchScope::Department(department(1))).await;
        add_rule(&store, z, MatchScope::Organization).await;
        add_rule(&store, t, MatchScope::Team(team(5))).await;

        auto_assign(&store, staff.id, old).await.unwrap();

        // Y is held through a manual grant instead.
        store
            .delete_assignments(staff.id, y, AssignmentSource::Department)
            .await
            .unwrap();
        store
            .insert_assignment(NewAssignment::new(staff.id, y, AssignmentSource::Manual))
            .await
            .unwrap();

        let report = sync_staff(&store, staff.id, old, new).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.unassigned(), 2);
        assert_eq!(report.assigned(), 1);

        // X is gone and not re-added as department 2 has no rule for it, Y stays manual and the
        // organization edge is kept. T is revoked with the former team and assigned again.
        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([
                (y, AssignmentSource::Manual),
                (z, AssignmentSource::Organization),
                (t, AssignmentSource::Team),
            ])
        );
        assert_eq!(
            log_count(
                &store,
                LogQuery::new()
                    .software(x)
                    .action(AssignmentAction::Unassigned)
            )
            .await,
            1
        );
    });
}

#[tokio::test]
async fn sync_retags_edge_of_unchanged_team() {
    assert_all_stores!(|store| async {
        let old = Membership::new(Some(department(1)), Some(team(3)));
        let new = Membership::new(Some(department(2)), Some(team(3)));
        let staff = add_staff(&store, "grace@example.org", old).await;

        let x = add_software(&store, "X").await;
        add_rule(&store, x, MatchScope::Team(team(3))).await;
        add_rule(&store, x, MatchScope::Department(department(2))).await;

        auto_assign(&store, staff.id, old).await.unwrap();
        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([(x, AssignmentSource::Team)])
        );

        // Only the department changed, the team edge is still replaced by the department one.
        let report = sync_staff(&store, staff.id, old, new).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.unassigned(), 1);
        assert_eq!(report.assigned(), 1);
        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([(x, AssignmentSource::Department)])
        );

        let unassigned = LogQuery::new()
            .software(x)
            .action(AssignmentAction::Unassigned);
        let assigned = LogQuery::new()
            .software(x)
            .action(AssignmentAction::Assigned);
        assert_eq!(log_count(&store, unassigned).await, 1);
        // One from the first assignment, one from the sync.
        assert_eq!(log_count(&store, assigned).await, 2);
    });
}

#[tokio::test]
async fn sync_between_departments_sharing_a_rule() {
    assert_all_stores!(|store| async {
        let old = Membership::new(Some(department(1)), None);
        let new = Membership::new(Some(department(2)), None);
        let staff = add_staff(&store, "grace@example.org", old).await;

        let x = add_software(&store, "X").await;
        let y = add_software(&store, "Y").await;
        add_rule(&store, x, MatchScope::Department(department(1))).await;
        add_rule(&store, x, MatchScope::Department(department(2))).await;
        add_rule(&store, y, MatchScope::Department(department(1))).await;

        auto_assign(&store, staff.id, old).await.unwrap();

        let report = sync_staff(&store, staff.id, old, new).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.unassigned(), 2);
        assert_eq!(report.assigned(), 1);

        // X is held once again through the new department, Y is gone.
        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([(x, AssignmentSource::Department)])
        );
        assert_eq!(store.assignments_for_software(x).await.unwrap().len(), 1);

        let unassigned = LogQuery::new()
            .software(x)
            .action(AssignmentAction::Unassigned);
        let assigned = LogQuery::new()
            .software(x)
            .action(AssignmentAction::Assigned);
        assert_eq!(log_count(&store, unassigned).await, 1);
        assert_eq!(log_count(&store, assigned).await, 2);
    });
}

#[tokio::test]
async fn sync_assigns_rules_of_new_unit() {
    assert_all_stores!(|store| async {
        let old = Membership::new(None, Some(team(1)));
        let new = Membership::new(None, Some(team(2)));
        let staff = add_staff(&store, "grace@example.org", old).await;

        let board = add_software(&store, "Board").await;
        let design = add_software(&store, "Design").await;
        add_rule(&store, board, MatchScope::Team(team(1))).await;
        add_rule(&store, board, MatchScope::Team(team(2))).await;
        add_rule(&store, design, MatchScope::Team(team(2))).await;

        auto_assign(&store, staff.id, old).await.unwrap();

        // Both teams match the board: it is revoked and assigned again for the new team.
        let report = sync_staff(&store, staff.id, old, new).await.unwrap();
        assert_eq!(report.unassigned(), 1);
        assert_eq!(report.assigned(), 2);
        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([
                (board, AssignmentSource::Team),
                (design, AssignmentSource::Team)
            ])
        );
    });
}

#[tokio::test]
async fn sync_without_change_is_noop() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(Some(department(1)), Some(team(1)));
        let staff = add_staff(&store, "grace@example.org", membership).await;
        let editor = add_software(&store, "Editor").await;
        add_rule(&store, editor, MatchScope::Department(department(1))).await;

        auto_assign(&store, staff.id, membership).await.unwrap();
        let logs_before = log_count(&store, LogQuery::new()).await;

        let report = sync_staff(&store, staff.id, membership, membership)
            .await
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(log_count(&store, LogQuery::new()).await, logs_before);
    });
}

#[tokio::test]
async fn revoke_from_source_keeps_manual_grant() {
    assert_all_stores!(|store| async {
        let staff = add_staff(&store, "grace@example.org", Membership::default()).await;
        let editor = add_software(&store, "Editor").await;
        add_rule(&store, editor, MatchScope::Team(team(3))).await;

        store
            .insert_assignment(NewAssignment::new(
                staff.id,
                editor,
                AssignmentSource::Manual,
            ))
            .await
            .unwrap();

        let report = revoke_from_source(&store, staff.id, MatchScope::Team(team(3)))
            .await
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([(editor, AssignmentSource::Manual)])
        );
    });
}

#[tokio::test]
async fn offboarding_preserves_manual_grants() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(Some(department(1)), None);
        let staff = add_staff(&store, "grace@example.org", membership).await;
        let x = add_software(&store, "X").await;
        let y = add_software(&store, "Y").await;
        add_rule(&store, x, MatchScope::Department(department(1))).await;

        auto_assign(&store, staff.id, membership).await.unwrap();
        store
            .insert_assignment(NewAssignment::new(staff.id, y, AssignmentSource::Manual))
            .await
            .unwrap();

        let report = revoke_all(&store, staff.id).await.unwrap();
        assert_eq!(report.unassigned(), 1);
        assert_eq!(report.changes[0].software_id, x);

        assert_eq!(
            holdings(&store, &staff).await,
            HashMap::from([(y, AssignmentSource::Manual)])
        );

        let unassigned = store
            .logs(&LogQuery::new().action(AssignmentAction::Unassigned))
            .await
            .unwrap();
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].software_id, x);
        assert_eq!(unassigned[0].staff_id, staff.id);
        assert!(unassigned[0].changed_by.is_system());
    });
}

#[tokio::test]
async fn rule_creation_skips_existing_edges() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(Some(department(7)), None);
        let a = add_staff(&store, "a@example.org", membership).await;
        let b = add_staff(&store, "b@example.org", membership).await;
        let outsider = add_staff(&store, "c@example.org", Membership::default()).await;
        let editor = add_software(&store, "Editor").await;

        store
            .insert_assignment(NewAssignment::new(a.id, editor, AssignmentSource::Manual))
            .await
            .unwrap();

        let rule = store
            .insert_match(editor, MatchScope::Department(department(7)))
            .await
            .unwrap()
            .unwrap();
        let report = rule_created(&store, &rule).await.unwrap();
        assert_eq!(report.assigned(), 1);
        assert_eq!(report.changes[0].staff_id, b.id);

        assert_eq!(
            holdings(&store, &a).await,
            HashMap::from([(editor, AssignmentSource::Manual)])
        );
        assert_eq!(
            holdings(&store, &b).await,
            HashMap::from([(editor, AssignmentSource::Department)])
        );
        assert!(holdings(&store, &outsider).await.is_empty());
    });
}

#[tokio::test]
async fn organization_rule_reaches_everyone() {
    assert_all_stores!(|store| async {
        let a = add_staff(&store, "a@example.org", Membership::default()).await;
        let b = add_staff(
            &store,
            "b@example.org",
            Membership::new(Some(department(1)), Some(team(1))),
        )
        .await;
        let mail = add_software(&store, "Mail").await;

        let rule = store
            .insert_match(mail, MatchScope::Organization)
            .await
            .unwrap()
            .unwrap();
        let report = rule_created(&store, &rule).await.unwrap();
        assert_eq!(report.assigned(), 2);

        for staff in [&a, &b] {
            assert_eq!(
                holdings(&store, staff).await,
                HashMap::from([(mail, AssignmentSource::Organization)])
            );
        }

        let report = rule_deleted(&store, &rule).await.unwrap();
        assert_eq!(report.unassigned(), 2);
        assert!(holdings(&store, &a).await.is_empty());
        assert_eq!(store.get_match(rule.id).await.unwrap(), None);
    });
}

#[tokio::test]
async fn rule_deletion_revokes_matching_source() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(Some(department(1)), None);
        let a = add_staff(&store, "a@example.org", membership).await;
        let b = add_staff(&store, "b@example.org", membership).await;
        let c = add_staff(&store, "c@example.org", membership).await;
        let x = add_software(&store, "X").await;

        // A holds X manually, B and C through the department rule.
        store
            .insert_assignment(NewAssignment::new(a.id, x, AssignmentSource::Manual))
            .await
            .unwrap();
        let rule = store
            .insert_match(x, MatchScope::Department(department(1)))
            .await
            .unwrap()
            .unwrap();
        rule_created(&store, &rule).await.unwrap();

        let report = rule_deleted(&store, &rule).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.unassigned(), 2);

        assert_eq!(
            holdings(&store, &a).await,
            HashMap::from([(x, AssignmentSource::Manual)])
        );
        assert!(holdings(&store, &b).await.is_empty());
        assert!(holdings(&store, &c).await.is_empty());
        assert_eq!(
            log_count(&store, LogQuery::new().action(AssignmentAction::Unassigned)).await,
            2
        );
        assert_eq!(store.get_match(rule.id).await.unwrap(), None);
    });
}

#[tokio::test]
async fn software_deletion_revokes_every_source() {
    assert_all_stores!(|store| async {
        let membership = Membership::new(None, Some(team(1)));
        let a = add_staff(&store, "a@example.org", membership).await;
        let b = add_staff(&store, "b@example.org", Membership::default()).await;
        let x = add_software(&store, "X").await;
        let y = add_software(&store, "Y").await;
        add_rule(&store, x, MatchScope::Team(team(1))).await;

        auto_assign(&store, a.id, membership).await.unwrap();
        store
            .insert_assignment(NewAssignment::new(b.id, x, AssignmentSource::Manual))
            .await
            .unwrap();
        store
            .insert_assignment(NewAssignment::new(b.id, y, AssignmentSource::Manual))
            .await
            .unwrap();

        let report = revoke_software(&store, x).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.unassigned(), 2);

        assert!(store.assignments_for_software(x).await.unwrap().is_empty());
        assert_eq!(store.get_software(x).await.unwrap(), None);
        assert_eq!(
            holdings(&store, &b).await,
            HashMap::from([(y, AssignmentSource::Manual)])
        );
    });
}

#[tokio::test]
async fn every_change_is_logged_once() {
    assert_all_stores!(|store| async {
        let old = Membership::new(Some(department(1)), Some(team(1)));
        let new = Membership::new(Some(department(2)), Some(team(2)));
        let a = add_staff(&store, "a@example.org", old).await;
        let b = add_staff(&store, "b@example.org", new).await;

        let mut software = Vec::new();
        for name in ["A", "B", "C", "D", "E"] {
            software.push(add_software(&store, name).await);
        }
        add_rule(&store, software[0], MatchScope::Department(department(1))).await;
        add_rule(&store, software[1], MatchScope::Team(team(1))).await;
        add_rule(&store, software[2], MatchScope::Department(department(2))).await;
        add_rule(&store, software[3], MatchScope::Organization).await;

        let mut changes = Vec::new();
        changes.extend(auto_assign(&store, a.id, old).await.unwrap().changes);
        changes.extend(auto_assign(&store, b.id, new).await.unwrap().changes);
        changes.extend(sync_staff(&store, a.id, old, new).await.unwrap().changes);
        let rule = store
            .insert_match(software[4], MatchScope::Team(team(2)))
            .await
            .unwrap()
            .unwrap();
        changes.extend(rule_created(&store, &rule).await.unwrap().changes);
        changes.extend(revoke_all(&store, b.id).await.unwrap().changes);
        changes.extend(revoke_software(&store, software[3]).await.unwrap().changes);

        let logs = store.logs(&LogQuery::new()).await.unwrap();
        assert_eq!(logs.len(), changes.len());

        let mut expected: HashMap<_, usize> = HashMap::new();
        for change in &changes {
            *expected
                .entry((change.staff_id, change.software_id, change.action))
                .or_default() += 1;
        }
        let mut logged: HashMap<_, usize> = HashMap::new();
        for entry in &logs {
            assert!(entry.changed_by.is_system());
            *logged
                .entry((entry.staff_id, entry.software_id, entry.action))
                .or_default() += 1;
        }
        assert_eq!(logged, expected);
    });
}

#[tokio::test]
async fn failed_read_aborts_before_writes() {
    let store = FaultyStore::default();
    let membership = Membership::new(Some(department(1)), None);
    let staff = add_staff(&store, "grace@example.org", membership).await;
    let editor = add_software(&store, "Editor").await;
    add_rule(&store, editor, MatchScope::Department(department(1))).await;

    store.faults.borrow_mut().rule_reads = true;
    assert_matches!(
        auto_assign(&store, staff.id, membership).await,
        Err(EngineError::Read(InjectedError))
    );
    assert_matches!(
        sync_staff(&store, staff.id, membership, Membership::default()).await,
        Err(EngineError::Read(InjectedError))
    );

    store.faults.borrow_mut().rule_reads = false;
    store.faults.borrow_mut().assignment_reads = true;
    assert_matches!(
        revoke_all(&store, staff.id).await,
        Err(EngineError::Read(InjectedError))
    );

    store.faults.borrow_mut().assignment_reads = false;
    assert!(holdings(&store, &staff).await.is_empty());
    assert_eq!(log_count(&store, LogQuery::new()).await, 0);
}

#[tokio::test]
async fn bulk_assignment_continues_after_failure() {
    let store = FaultyStore::default();
    let membership = Membership::new(None, Some(team(1)));
    let a = add_staff(&store, "a@example.org", membership).await;
    let b = add_staff(&store, "b@example.org", membership).await;
    let c = add_staff(&store, "c@example.org", membership).await;
    let editor = add_software(&store, "Editor").await;

    store.faults.borrow_mut().inserts_for.insert(b.id);

    let rule = store
        .insert_match(editor, MatchScope::Team(team(1)))
        .await
        .unwrap()
        .unwrap();
    let report = rule_created(&store, &rule).await.unwrap();

    assert_eq!(report.assigned(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].staff_id, b.id);
    assert_eq!(report.failures[0].stage, Stage::Assign);

    assert!(!holdings(&store, &a).await.is_empty());
    assert!(holdings(&store, &b).await.is_empty());
    assert!(!holdings(&store, &c).await.is_empty());

    // Failed items write no log entry.
    assert_eq!(log_count(&store, LogQuery::new()).await, 2);
    assert_matches!(report.into_result(), Err(EngineError::Write(InjectedError)));
}

#[tokio::test]
async fn failed_log_keeps_change() {
    let store = FaultyStore::default();
    let membership = Membership::new(Some(department(1)), None);
    let staff = add_staff(&store, "grace@example.org", membership).await;
    let editor = add_software(&store, "Editor").await;
    add_rule(&store, editor, MatchScope::Department(department(1))).await;

    store.faults.borrow_mut().logs = true;
    let report = auto_assign(&store, staff.id, membership).await.unwrap();

    assert_eq!(report.assigned(), 1);
    assert!(report.failed_at(Stage::Log));
    assert!(!report.failed_at(Stage::Assign));
    assert_eq!(
        holdings(&store, &staff).await,
        HashMap::from([(editor, AssignmentSource::Department)])
    );
}

#[tokio::test]
async fn software_record_kept_when_revoking_fails() {
    let store = FaultyStore::default();
    let a = add_staff(&store, "a@example.org", Membership::default()).await;
    let b = add_staff(&store, "b@example.org", Membership::default()).await;
    let editor = add_software(&store, "Editor").await;
    for staff in [&a, &b] {
        store
            .insert_assignment(NewAssignment::new(
                staff.id,
                editor,
                AssignmentSource::Manual,
            ))
            .await
            .unwrap();
    }

    store.faults.borrow_mut().deletes_for.insert(a.id);
    let report = revoke_software(&store, editor).await.unwrap();
    assert_eq!(report.unassigned(), 1);
    assert!(report.failed_at(Stage::Revoke));
    assert!(store.get_software(editor).await.unwrap().is_some());

    // Retrying after the fault is gone finishes the deletion.
    store.faults.borrow_mut().deletes_for.clear();
    let report = revoke_software(&store, editor).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.unassigned(), 1);
    assert_eq!(store.get_software(editor).await.unwrap(), None);
}

#[tokio::test]
async fn failed_rule_deletion_revokes_nothing() {
    let store = FaultyStore::default();
    let membership = Membership::new(Some(department(1)), None);
    let staff = add_staff(&store, "grace@example.org", membership).await;
    let editor = add_software(&store, "Editor").await;
    let rule = store
        .insert_match(editor, MatchScope::Department(department(1)))
        .await
        .unwrap()
        .unwrap();
    rule_created(&store, &rule).await.unwrap();

    store.faults.borrow_mut().rule_deletes = true;
    assert_matches!(
        rule_deleted(&store, &rule).await,
        Err(EngineError::Write(InjectedError))
    );
    assert_eq!(
        holdings(&store, &staff).await,
        HashMap::from([(editor, AssignmentSource::Department)])
    );
    assert!(store.get_match(rule.id).await.unwrap().is_some());
}
