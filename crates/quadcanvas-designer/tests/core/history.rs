use quadcanvas_core::{CanvasObject, CommandError, HistoryError, ObjectId, Point, RepositoryError};
use quadcanvas_designer::{CanvasCommand, CommandHistory, DrawingObject, Repository, Shape};

fn rect(id: u64, x: f64, y: f64) -> DrawingObject {
    DrawingObject::new(ObjectId(id), Shape::rectangle(x, y, 100.0, 100.0))
}

fn moved(object: &DrawingObject, x: f64, y: f64) -> CanvasCommand<DrawingObject> {
    let mut after = object.clone();
    after.move_to(x, y);
    CanvasCommand::modify(object.clone(), after)
        .unwrap()
        .with_name("Move Object")
}

#[test]
fn test_history_creation() {
    let history: CommandHistory<DrawingObject> = CommandHistory::new(50).unwrap();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.undo_depth(), 0);
    assert_eq!(history.redo_depth(), 0);
    assert!(history.is_empty());
    assert_eq!(history.max_history_size(), 50);
}

#[test]
fn test_zero_history_size_is_rejected() {
    let result = CommandHistory::<DrawingObject>::new(0);
    assert_eq!(result.unwrap_err(), HistoryError::InvalidMaxSize);
}

#[test]
fn test_undo_redo_on_empty_history() {
    let mut repo = Repository::new();
    let mut history = CommandHistory::<DrawingObject>::default();
    assert!(!history.undo(&mut repo).unwrap());
    assert!(!history.redo(&mut repo).unwrap());
    assert!(repo.is_empty());
}

#[test]
fn test_create_modify_undo_redo_scenario() {
    let mut repo = Repository::new();
    let mut history = CommandHistory::new(50).unwrap();
    let a = rect(1, 0.0, 0.0);
    let b = rect(2, 300.0, 0.0);

    history.execute(CanvasCommand::create(a.clone()), &mut repo).unwrap();
    history.execute(CanvasCommand::create(b.clone()), &mut repo).unwrap();
    history.execute(moved(&a, 50.0, 0.0), &mut repo).unwrap();

    assert_eq!(repo.get_by_id(ObjectId(1)).unwrap().bounds().min_x, 50.0);
    assert_eq!(history.undo_description().as_deref(), Some("Move Object"));

    // Undo the move: A is back at x = 0 and the index agrees.
    assert!(history.undo(&mut repo).unwrap());
    assert_eq!(repo.get_by_id(ObjectId(1)), Some(&a));
    assert_eq!(
        repo.hit_test(&Point::new(25.0, 50.0)).map(|o| o.id()),
        Some(ObjectId(1))
    );

    // Undo the second create: B is gone.
    assert!(history.undo(&mut repo).unwrap());
    assert!(!repo.contains(ObjectId(2)));
    assert!(repo.hit_test(&Point::new(350.0, 50.0)).is_none());
    assert_eq!(history.redo_depth(), 2);

    // Redo brings B back.
    assert!(history.redo(&mut repo).unwrap());
    assert_eq!(repo.get_by_id(ObjectId(2)), Some(&b));
    assert_eq!(history.redo_description().as_deref(), Some("Move Object"));

    // A new command discards the pending move.
    history
        .execute(CanvasCommand::create(rect(3, 600.0, 0.0)), &mut repo)
        .unwrap();
    assert!(!history.can_redo());
    assert!(!history.redo(&mut repo).unwrap());
    assert_eq!(repo.get_by_id(ObjectId(1)).unwrap().bounds().min_x, 0.0);
    assert_eq!(
        history.full_history(),
        vec!["Create Object", "Create Object", "Create Object"]
    );
}

#[test]
fn test_undo_all_then_redo_all_restores_state() {
    let mut repo = Repository::new();
    let mut history = CommandHistory::new(50).unwrap();
    let a = rect(1, 0.0, 0.0);

    history.execute(CanvasCommand::create(a.clone()), &mut repo).unwrap();
    history.execute(CanvasCommand::create(rect(2, 200.0, 0.0)), &mut repo).unwrap();
    history.execute(moved(&a, 400.0, 400.0), &mut repo).unwrap();
    history.execute(CanvasCommand::delete(ObjectId(2)), &mut repo).unwrap();

    let final_objects: Vec<DrawingObject> = repo.get_all().cloned().collect();

    while history.undo(&mut repo).unwrap() {}
    assert!(repo.is_empty());
    assert!(repo.spatial_index().is_empty());
    assert_eq!(history.redo_depth(), 4);

    while history.redo(&mut repo).unwrap() {}
    let restored: Vec<DrawingObject> = repo.get_all().cloned().collect();
    assert_eq!(restored, final_objects);
    assert_eq!(
        repo.hit_test(&Point::new(450.0, 450.0)).map(|o| o.id()),
        Some(ObjectId(1))
    );
}

#[test]
fn test_history_is_bounded() {
    let mut repo = Repository::new();
    let mut history = CommandHistory::new(3).unwrap();

    for i in 1..=5 {
        history
            .execute(CanvasCommand::create(rect(i, i as f64 * 200.0, 0.0)), &mut repo)
            .unwrap();
        assert!(history.len() <= 3);
    }
    assert_eq!(history.undo_depth(), 3);

    for _ in 0..3 {
        assert!(history.undo(&mut repo).unwrap());
    }
    assert!(!history.undo(&mut repo).unwrap());

    // The two evicted creations can no longer be undone.
    let remaining: Vec<ObjectId> = repo.get_all().map(|o| o.id()).collect();
    assert_eq!(remaining, vec![ObjectId(1), ObjectId(2)]);
}

#[test]
fn test_failed_execute_is_not_recorded() {
    let mut repo = Repository::new();
    let mut history = CommandHistory::new(10).unwrap();

    history.execute(CanvasCommand::create(rect(1, 0.0, 0.0)), &mut repo).unwrap();
    history.execute(CanvasCommand::create(rect(2, 200.0, 0.0)), &mut repo).unwrap();
    history.undo(&mut repo).unwrap();

    let err = history
        .execute(CanvasCommand::delete(ObjectId(9)), &mut repo)
        .unwrap_err();
    assert!(matches!(
        err,
        HistoryError::Command(CommandError::MissingTarget { id: ObjectId(9), .. })
    ));
    assert_eq!(history.undo_depth(), 1);
    assert_eq!(history.redo_depth(), 1);

    let err = history
        .execute(CanvasCommand::create(rect(1, 0.0, 0.0)), &mut repo)
        .unwrap_err();
    assert_eq!(
        err,
        HistoryError::Command(CommandError::Repository(RepositoryError::DuplicateId {
            id: ObjectId(1)
        }))
    );
    assert!(history.can_redo());
}

#[test]
fn test_undo_failure_keeps_cursor() {
    let mut repo = Repository::new();
    let mut history = CommandHistory::new(10).unwrap();

    history.execute(CanvasCommand::create(rect(1, 0.0, 0.0)), &mut repo).unwrap();
    // Someone removed the object behind the history's back.
    repo.remove(ObjectId(1));

    assert!(history.undo(&mut repo).is_err());
    assert_eq!(history.undo_depth(), 1);
    assert!(!history.can_redo());
}

#[test]
fn test_clear_history() {
    let mut repo = Repository::new();
    let mut history = CommandHistory::new(10).unwrap();
    history.execute(CanvasCommand::create(rect(1, 0.0, 0.0)), &mut repo).unwrap();
    history.execute(CanvasCommand::create(rect(2, 0.0, 0.0)), &mut repo).unwrap();
    history.undo(&mut repo).unwrap();

    history.clear();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert!(history.undo_description().is_none());
    assert_eq!(repo.len(), 1);
}
