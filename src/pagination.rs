//! Batch pagination
//!
//! Splits an ordered input into fixed-size pages and hands each page to a
//! per-page action before pulling further input, so that paging and
//! submission interleave and memory stays bounded on large inputs. Pages are
//! produced strictly in input order, one at a time; the async driver awaits
//! each page's action to completion before building the next page, so at most
//! one page submission is ever in flight.

/// Lazy iterator of fixed-size pages over an input iterator.
///
/// Every page has exactly `page_size` items except possibly the last, which
/// may be shorter. A non-empty input never produces an empty page.
#[derive(Debug)]
pub struct Pages<I> {
    inner: I,
    page_size: usize,
}

impl<I: Iterator> Iterator for Pages<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut page = Vec::with_capacity(self.page_size);
        while page.len() < self.page_size {
            match self.inner.next() {
                Some(item) => page.push(item),
                None => break,
            }
        }
        if page.is_empty() { None } else { Some(page) }
    }
}

/// Split an input into fixed-size pages, lazily and in order.
pub fn pages<I>(items: I, page_size: usize) -> Pages<I::IntoIter>
where
    I: IntoIterator,
{
    debug_assert!(page_size > 0, "page size must be non-zero");
    Pages {
        inner: items.into_iter(),
        page_size,
    }
}

/// Run an async action for every page, one page at a time.
///
/// The next page is not built until the current page's action has completed;
/// an error aborts the remaining pages.
pub async fn for_each_page<I, T, F, Fut, E>(items: I, page_size: usize, mut action: F) -> Result<(), E>
where
    I: IntoIterator<Item = T>,
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    for page in pages(items, page_size) {
        action(page).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_preserve_order_and_sizes() {
        let input: Vec<u32> = (0..10).collect();
        let result: Vec<Vec<u32>> = pages(input.clone(), 3).collect();

        assert_eq!(result.len(), 4);
        assert_eq!(result[0], vec![0, 1, 2]);
        assert_eq!(result[3], vec![9]);
        for page in &result {
            assert!(!page.is_empty());
            assert!(page.len() <= 3);
        }

        let concatenated: Vec<u32> = result.into_iter().flatten().collect();
        assert_eq!(concatenated, input);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let result: Vec<Vec<u32>> = pages(0..9u32, 3).collect();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|p| p.len() == 3));
    }

    #[test]
    fn empty_input_yields_no_pages() {
        let result: Vec<Vec<u32>> = pages(std::iter::empty(), 50).collect();
        assert!(result.is_empty());
    }

    #[test]
    fn single_short_page() {
        let result: Vec<Vec<u32>> = pages(0..2u32, 50).collect();
        assert_eq!(result, vec![vec![0, 1]]);
    }

    #[test]
    fn pages_are_submitted_in_order() {
        let mut seen: Vec<Vec<u32>> = Vec::new();
        tokio_test::block_on(for_each_page(0..7u32, 2, |page| {
            seen.push(page);
            async { Ok::<_, ()>(()) }
        }))
        .unwrap();

        assert_eq!(seen, vec![vec![0, 1], vec![2, 3], vec![4, 5], vec![6]]);
    }

    #[test]
    fn error_aborts_remaining_pages() {
        let mut calls = 0u32;
        let result = tokio_test::block_on(for_each_page(0..100u32, 10, |_page| {
            calls += 1;
            let fail = calls == 2;
            async move { if fail { Err("boom") } else { Ok(()) } }
        }));

        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 2);
    }
}
