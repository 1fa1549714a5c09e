use sha2::{Digest, Sha256};

use crate::retriever::ScoredHit;

pub const EXTERNAL_PACK: &str = "external";
const BLOCK_SEPARATOR: &str = "\n\n";
const EXTERNAL_ID_HEX_LEN: usize = 16;

/// Caller-supplied ad-hoc evidence, e.g. pasted article text. When no
/// id is given, one is derived from the content hash so repeated
/// assembly of identical text yields an identical source id.
#[derive(Debug, Clone)]
pub struct ExternalDoc {
    pub id: Option<String>,
    pub title: String,
    pub text: String,
}

impl ExternalDoc {
    pub fn pasted(text: impl Into<String>) -> Self {
        Self {
            id: None,
            title: "pasted".to_string(),
            text: text.into(),
        }
    }

    /// Stable source id, namespaced `ext:` so it can never collide
    /// with a corpus card id.
    pub fn source_id(&self) -> String {
        match &self.id {
            Some(id) => format!("ext:{id}"),
            None => {
                let digest = Sha256::digest(self.text.as_bytes());
                format!("ext:{}", &hex::encode(digest)[..EXTERNAL_ID_HEX_LEN])
            }
        }
    }
}

/// Merges retrieved cards and external documents into one evidence
/// string: one tagged block per source, joined by a fixed separator.
pub fn assemble(hits: &[ScoredHit], external_docs: &[ExternalDoc]) -> String {
    let mut blocks = Vec::with_capacity(hits.len() + external_docs.len());
    for hit in hits {
        let card = &hit.card;
        blocks.push(format!(
            "[source_id:{}] PACK:{} TITLE:{} SUB:{} WEIGHT:{:.2}\n{}",
            card.id, card.pack, card.meta.title, card.meta.subtopic, card.weight, card.text
        ));
    }
    for doc in external_docs {
        blocks.push(format!(
            "[source_id:{}] PACK:{} TITLE:{} SUB: WEIGHT:1.00\n{}",
            doc.source_id(),
            EXTERNAL_PACK,
            doc.title,
            doc.text
        ));
    }
    blocks.join(BLOCK_SEPARATOR)
}
