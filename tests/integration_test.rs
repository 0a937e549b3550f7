use ege_workbench::config::Config;
use ege_workbench::infrastructure::PageFetcher;
use ege_workbench::services::{ProblemListParser, StatementExtractor};
use ege_workbench::utils::logging;

// These tests hit the live site. Ignored by default, run manually:
// cargo test -- --ignored

#[tokio::test]
#[ignore]
async fn test_listing_page_is_reachable() {
    logging::init();

    let config = Config::load().expect("загрузка конфигурации не удалась");
    let fetcher = PageFetcher::new(&config).expect("создание клиента не удалось");

    let html = fetcher
        .fetch_html(&config.listing_url)
        .await
        .expect("страница со списком недоступна");

    let count = ProblemListParser::problem_count(&html).expect("список задач не найден");
    println!("найдено задач: {count}");
    assert!(count > 0, "страница должна содержать хотя бы одну задачу");
}

#[tokio::test]
#[ignore]
async fn test_first_problem_has_a_statement() {
    logging::init();

    let config = Config::load().expect("загрузка конфигурации не удалась");
    let fetcher = PageFetcher::new(&config).expect("создание клиента не удалось");

    let html = fetcher
        .fetch_html(&config.listing_url)
        .await
        .expect("страница со списком недоступна");

    let body = ProblemListParser::problem_body_html(&html, 1).expect("тело задачи 1 не найдено");
    let statement = StatementExtractor::extract(&body);

    println!("текст задачи 1:\n{}", statement.text);
    assert!(!statement.text.is_empty(), "текст задачи не должен быть пуст");
}

#[tokio::test]
#[ignore]
async fn test_answer_links_resolve() {
    logging::init();

    let config = Config::load().expect("загрузка конфигурации не удалась");
    let fetcher = PageFetcher::new(&config).expect("создание клиента не удалось");

    let html = fetcher
        .fetch_html(&config.listing_url)
        .await
        .expect("страница со списком недоступна");

    let entries = ProblemListParser::entries(&html, &config.site_origin())
        .expect("ссылки на ответы не найдены");
    assert!(!entries.is_empty());

    let answer_page = fetcher
        .fetch_html(&entries[0].answer_link)
        .await
        .expect("страница ответа недоступна");
    let correct =
        ege_workbench::services::answer_checker::extract_correct_answer(&answer_page, entries[0].number)
            .expect("ответ не извлечён");
    println!("ответ задачи {}: {correct}", entries[0].number);
}
