use crate::index::{DocumentId, Index};

/// Knowledge base loaded at start-up.
pub const SEED_CORPUS: &[&str] = &[
    "RAG Retrieval Augmented Generation архитектура поиск информация генерация текст",
    "RAG сначала ищет релевантные документы базе знаний затем использует генерацию ответа",
    "Векторный поиск позволяет находить семантически похожие тексты точное совпадение слов",
    "Telegram боты создаются BotFather используют API отправки сообщений",
    "Go Golang статически типизированный язык программирования сборщик мусора поддержка многопоточности",
    "Docker позволяет упаковывать приложения контейнеры удобное развертывание",
    "API ключи необходимы доступа сервисам искусственного интеллекта DeepSeek OpenRouter",
    "Программирование разработка программ обеспечение компьютеров алгоритмы код",
    "Искусственный интеллект AI машинное обучение нейронные сети данные обучение модели",
    "База данных хранение информации структурированные данные запросы SQL",
    "Веб разработка создание сайтов приложений интерфейсы backend frontend",
    "Мобильные приложения iOS Android разработка телефоны планшеты",
    "Облачные вычисления сервера хранение данных AWS Google Cloud Azure",
    "Блокчейн криптовалюты Bitcoin Ethereum смарт контракты децентрализация",
];

/// Add every seed text, in order, through the regular ingestion path.
pub fn load_seed_corpus(index: &Index) -> Vec<DocumentId> {
    let ids: Vec<DocumentId> = SEED_CORPUS.iter().map(|text| index.add_document(text)).collect();
    let stats = index.stats();
    tracing::info!(seeded = ids.len(), num_docs = stats.document_count, vocabulary_size = stats.vocabulary_size, "loaded seed corpus");
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_corpus_is_searchable() {
        let index = Index::default();
        let ids = load_seed_corpus(&index);
        assert_eq!(ids.len(), SEED_CORPUS.len());
        assert_eq!(ids.first().map(String::as_str), Some("doc_0"));

        let hits = index.search_similar("блокчейн криптовалюты", 3);
        assert_eq!(hits[0].content, SEED_CORPUS[13]);
    }
}
