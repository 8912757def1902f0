use exam_core::model::{AnswerKey, AnswerOption, OptionKey, Question, QuestionId};
use storage::repository::{QuestionBankLoader, Storage, StorageError};
use storage::sqlite::SqliteRepository;

fn build_question(qid: &str, keys: &[&str], correct: &[&str]) -> Question {
    let options = keys
        .iter()
        .map(|k| AnswerOption::new(OptionKey::new(*k).unwrap(), format!("{qid} option {k}")))
        .collect();
    let correct = AnswerKey::from_keys(correct.iter().map(|k| OptionKey::new(*k).unwrap())).unwrap();
    Question::new(QuestionId::new(qid).unwrap(), format!("Prompt {qid}"), options, correct).unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_keeps_order_and_answers() {
    let repo = SqliteRepository::connect("sqlite:file:bank_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let questions = vec![
        build_question("q2", &["C", "A", "B"], &["A"]),
        build_question("q1", &["A", "B", "C", "D"], &["B", "D"]),
    ];
    repo.upsert_questions(&questions).await.expect("upsert");

    let loaded = repo.load().await.expect("load");
    assert_eq!(loaded, questions);
    assert_eq!(repo.question_count().await.unwrap(), 2);
}

#[tokio::test]
async fn sqlite_upsert_replaces_existing_question() {
    let repo = SqliteRepository::connect("sqlite:file:bank_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.migrate().await.expect("migrations are re-runnable");

    repo.upsert_questions(&[build_question("q1", &["A", "B"], &["A"])])
        .await
        .unwrap();
    let updated = build_question("q1", &["X", "Y", "Z"], &["Z"]);
    repo.upsert_questions(std::slice::from_ref(&updated))
        .await
        .unwrap();

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded, vec![updated]);
}

#[tokio::test]
async fn sqlite_empty_bank_is_an_error() {
    let storage = Storage::sqlite("sqlite:file:bank_empty?mode=memory&cache=shared")
        .await
        .expect("storage");
    let err = storage.bank.load().await.unwrap_err();
    assert!(matches!(err, StorageError::EmptyBank));
}
