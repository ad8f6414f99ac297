//! Knowledge base build pipeline integration tests
//!
//! Exercises the full ingestion path (enumerate, extract, chunk, embed,
//! index) over a plain-text corpus with the deterministic hashed provider,
//! so no model download is required.

use std::sync::Arc;
use tempfile::TempDir;

use acervo::config::Config;
use acervo::embedding::{EmbeddingProvider, HashedProvider};
use acervo::knowledge::{KnowledgeBase, PlainTextExtractor, DOCUMENT_BOUNDARY};

fn corpus_config(temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.knowledge.directory = temp.path().to_path_buf();
    config.knowledge.extension = "txt".to_string();
    config.chunking.chunk_size = 120;
    config.chunking.chunk_overlap = 20;
    config
}

fn hashed_provider() -> Option<Arc<dyn EmbeddingProvider>> {
    Some(Arc::new(HashedProvider::new(128)))
}

#[test]
fn test_full_build_pipeline() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("01_certidoes.txt"),
        "A certidão negativa de débitos comprova a ausência de pendências fiscais. \
         O pedido pode ser feito pela internet e a emissão é gratuita. "
            .repeat(3),
    )
    .unwrap();
    std::fs::write(
        temp.path().join("02_multas.txt"),
        "O recurso contra multa de trânsito deve ser protocolado em até trinta dias. \
         A defesa prévia suspende a exigibilidade da penalidade. "
            .repeat(3),
    )
    .unwrap();

    let config = corpus_config(&temp);
    let kb = KnowledgeBase::build(&config, &PlainTextExtractor, hashed_provider());

    assert!(kb.is_ready());
    assert_eq!(kb.document_count(), 2);
    assert!(kb.chunk_count() > 2);

    // Index holds exactly one vector per chunk, ids dense from zero
    let index = kb.index().unwrap();
    assert_eq!(index.len(), kb.chunk_count());

    let all_ids: Vec<i64> = (0..kb.chunk_count() as i64).collect();
    let resolved = kb.chunks_by_ids(&all_ids);
    assert_eq!(resolved.len(), kb.chunk_count());

    // The two documents are separated by the visible boundary marker
    let rebuilt: String = {
        let mut text = resolved[0].text.clone();
        for chunk in &resolved[1..] {
            text.push_str(&chunk.text.chars().skip(20).collect::<String>());
        }
        text
    };
    assert!(rebuilt.contains(DOCUMENT_BOUNDARY.trim()));
    assert!(rebuilt.contains("certidão negativa"));
    assert!(rebuilt.contains("recurso contra multa"));
}

#[test]
fn test_build_is_deterministic() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("b.txt"),
        "Segundo documento do acervo de testes.",
    )
    .unwrap();
    std::fs::write(
        temp.path().join("a.txt"),
        "Primeiro documento do acervo de testes.",
    )
    .unwrap();

    let config = corpus_config(&temp);
    let first = KnowledgeBase::build(&config, &PlainTextExtractor, hashed_provider());
    let second = KnowledgeBase::build(&config, &PlainTextExtractor, hashed_provider());

    assert_eq!(first.chunk_count(), second.chunk_count());
    let ids: Vec<i64> = (0..first.chunk_count() as i64).collect();
    assert_eq!(first.chunks_by_ids(&ids), second.chunks_by_ids(&ids));

    // Sorted enumeration puts a.txt before b.txt regardless of creation order
    assert!(first.chunks_by_ids(&[0])[0].text.starts_with("Primeiro"));
}

#[test]
fn test_empty_directory_degrades_to_not_ready() {
    let temp = TempDir::new().unwrap();
    let config = corpus_config(&temp);
    let kb = KnowledgeBase::build(&config, &PlainTextExtractor, hashed_provider());

    assert!(!kb.is_ready());
    assert_eq!(kb.chunk_count(), 0);
    assert!(kb.chunks_by_ids(&[0, 1, 2]).is_empty());
}

#[test]
fn test_unreadable_document_does_not_abort_build() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a_invalido.txt"), [0xFF, 0xFE, 0x00]).unwrap();
    std::fs::write(
        temp.path().join("b_valido.txt"),
        "Documento legível que deve ser ingerido normalmente.",
    )
    .unwrap();

    let config = corpus_config(&temp);
    let kb = KnowledgeBase::build(&config, &PlainTextExtractor, hashed_provider());

    assert!(kb.is_ready());
    assert_eq!(kb.document_count(), 1);
}

#[test]
fn test_extension_filter_is_exact() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("ignorado.md"), "# não deve entrar").unwrap();
    std::fs::write(temp.path().join("usado.txt"), "conteúdo indexável").unwrap();

    let config = corpus_config(&temp);
    let kb = KnowledgeBase::build(&config, &PlainTextExtractor, hashed_provider());

    assert_eq!(kb.document_count(), 1);
    assert!(!kb.chunks_by_ids(&[0])[0].text.contains("não deve entrar"));
}
