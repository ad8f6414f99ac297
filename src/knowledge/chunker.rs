//! Fixed-width text chunking with overlap

/// Split text into fixed-size overlapping character windows
///
/// Windows are measured in characters, so multi-byte text never splits
/// inside a code point. The final chunk may be shorter than `size`.
/// Windowing is purely positional: chunks can cut through words and
/// sentences. That is the accepted trade-off for predictable chunk ids.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || size == 0 {
        return Vec::new();
    }

    // Byte offset of every char boundary, with the end appended so a
    // window can be sliced as boundaries[start]..boundaries[end].
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let total_chars = boundaries.len() - 1;

    // overlap >= size would step zero or backwards; fall back to a full
    // window so the loop always terminates.
    let step = if size > overlap { size - overlap } else { size };

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < total_chars {
        let end = (start + size).min(total_chars);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        start += step;
    }

    chunks
}
