//! Integration tests for the extraction pipeline, driven through fake
//! collaborators so no PDFs, binaries, or network are needed.

use serde_json::Value;

use unsheet::error::Result;
use unsheet::extract::{Extractor, ExtractOptions, TableStyle};
use unsheet::llm::{ProviderError, StructuringChain, StructuringProvider};
use unsheet::model::RawTableGrid;
use unsheet::ocr::{PageImage, PageRasterizer, TextRecognizer};
use unsheet::output::{to_json, JsonFormat};
use unsheet::pdf::PdfSource;
use unsheet::DocumentRecord;

/// In-memory document source.
struct FakeSource {
    pages: Vec<String>,
    grids: Vec<Vec<RawTableGrid>>,
}

impl FakeSource {
    fn with_text(text: &str) -> Self {
        Self {
            pages: vec![text.to_string()],
            grids: vec![vec![]],
        }
    }

    fn with_grids(grids: Vec<RawTableGrid>) -> Self {
        Self {
            pages: vec![String::new()],
            grids: vec![grids],
        }
    }
}

impl PdfSource for FakeSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        Ok(self.pages[(page - 1) as usize].clone())
    }

    fn page_grids(&self, page: u32) -> Result<Vec<RawTableGrid>> {
        Ok(self.grids[(page - 1) as usize].clone())
    }
}

/// OCR fakes: one recognized text per page.
struct FakeOcr {
    pages: Vec<String>,
}

impl PageRasterizer for FakeOcr {
    fn rasterize(&self, page: u32) -> Result<PageImage> {
        Ok(PageImage {
            png: vec![page as u8],
        })
    }
}

impl TextRecognizer for FakeOcr {
    fn recognize(&self, image: &PageImage) -> Result<String> {
        Ok(self.pages[(image.png[0] - 1) as usize].clone())
    }
}

fn empty_ocr() -> FakeOcr {
    FakeOcr {
        pages: vec![String::new()],
    }
}

/// A rasterizer that must never be reached.
struct UnreachableOcr;

impl PageRasterizer for UnreachableOcr {
    fn rasterize(&self, _page: u32) -> Result<PageImage> {
        panic!("OCR fallback must not run when vector tables exist");
    }
}

impl TextRecognizer for UnreachableOcr {
    fn recognize(&self, _image: &PageImage) -> Result<String> {
        panic!("OCR fallback must not run when vector tables exist");
    }
}

/// Scripted structuring provider.
struct FixedProvider {
    result: std::result::Result<Value, &'static str>,
}

impl StructuringProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn structure(&self, _text: &str) -> std::result::Result<Value, ProviderError> {
        match &self.result {
            Ok(value) => Ok(value.clone()),
            Err(msg) => Err(ProviderError::Transport((*msg).to_string())),
        }
    }
}

fn grid(rows: Vec<Vec<Option<&str>>>) -> RawTableGrid {
    RawTableGrid {
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.map(String::from)).collect())
            .collect(),
    }
}

fn run_rules(source: &FakeSource, ocr: &FakeOcr) -> DocumentRecord {
    Extractor::new()
        .run(source, ocr, ocr, &StructuringChain::new(vec![]))
        .unwrap()
}

#[test]
fn scenario_a_header_only() {
    let source = FakeSource::with_text("Name Alice\nDate 05/06/2024\nnothing else here");
    let record = run_rules(&source, &empty_ocr());

    assert_eq!(record.name(), Some("Alice"));
    assert_eq!(record.date(), Some("05/06/2024"));
    assert!(!record.contains_key("Mapping the Flow"));
    assert!(!record.contains_key("Story"));
}

#[test]
fn scenario_b_story_section() {
    let source =
        FakeSource::with_text("Story\nHello there\n• Do thing one\n• Do thing two\nConclusion:");
    let record = run_rules(&source, &empty_ocr());

    let story = record.get("Story").unwrap();
    assert_eq!(story["message"], "Hello there");
    assert_eq!(
        story["actions"],
        serde_json::json!(["Do thing one", "Do thing two"])
    );
}

#[test]
fn scenario_c_length_mismatch_row_dropped() {
    let source = FakeSource::with_grids(vec![grid(vec![
        vec![Some("Col1"), Some("Col2")],
        vec![Some("a"), Some("b")],
        vec![Some("c")],
    ])]);
    let record = run_rules(&source, &empty_ocr());

    let tables = record.get("tables").unwrap();
    assert_eq!(tables.as_array().unwrap().len(), 1);
    assert_eq!(tables[0], serde_json::json!([{"Col1": "a", "Col2": "b"}]));
}

#[test]
fn scenario_d_ocr_fallback_when_no_grids() {
    let source = FakeSource::with_text("no tables in the vector layout");
    let ocr = FakeOcr {
        pages: vec!["Item1   Value1\nprose line".to_string()],
    };
    let record = run_rules(&source, &ocr);

    let tables = record.get("tables").unwrap();
    assert_eq!(
        tables[0],
        serde_json::json!([{"col_1": "Item1", "col_2": "Value1"}])
    );
}

#[test]
fn scenario_e_chain_exhaustion_falls_back_to_rules() {
    let source = FakeSource::with_text("Name Bob\nDate 01/02/2023");
    let ocr = empty_ocr();

    let chain = StructuringChain::new(vec![
        Box::new(FixedProvider {
            result: Err("connection refused"),
        }),
        Box::new(FixedProvider {
            result: Err("connection reset"),
        }),
    ]);
    let with_failed_chain = Extractor::new().run(&source, &ocr, &ocr, &chain).unwrap();
    let rule_based = run_rules(&source, &ocr);

    assert_eq!(with_failed_chain, rule_based);
    assert_eq!(with_failed_chain.name(), Some("Bob"));
}

#[test]
fn chain_success_replaces_record_verbatim() {
    let source = FakeSource::with_grids(vec![grid(vec![
        vec![Some("Col1"), Some("Col2")],
        vec![Some("a"), Some("b")],
        vec![Some("c"), Some("d")],
    ])]);
    let ocr = empty_ocr();

    let chain = StructuringChain::new(vec![Box::new(FixedProvider {
        result: Ok(serde_json::json!({"structured": true})),
    })]);
    let record = Extractor::new().run(&source, &ocr, &ocr, &chain).unwrap();

    assert_eq!(record.get("structured"), Some(&Value::Bool(true)));
    // Tables are not merged into a successful chain result.
    assert!(!record.contains_key("tables"));
}

#[test]
fn vector_tables_suppress_ocr() {
    let source = FakeSource::with_grids(vec![grid(vec![
        vec![Some("Col1"), Some("Col2")],
        vec![Some("a"), Some("b")],
        vec![Some("c"), Some("d")],
    ])]);

    let record = Extractor::new()
        .run(
            &source,
            &UnreachableOcr,
            &UnreachableOcr,
            &StructuringChain::new(vec![]),
        )
        .unwrap();
    assert!(record.contains_key("tables"));
}

#[test]
fn grid_without_fully_populated_row_yields_no_table() {
    let source = FakeSource {
        pages: vec![String::new()],
        grids: vec![vec![grid(vec![
            vec![Some("a"), None],
            vec![None, Some("b")],
            vec![Some("c"), None],
        ])]],
    };
    // The sparse grid yields nothing and the OCR fallback finds nothing
    // tabular either, so the tables entry is an empty array.
    let record = run_rules(&source, &empty_ocr());
    assert_eq!(record.get("tables"), Some(&Value::Array(vec![])));
}

#[test]
fn absent_header_fields_are_null_not_missing() {
    let source = FakeSource::with_text("no markers at all");
    let record = run_rules(&source, &empty_ocr());

    assert_eq!(record.get("name"), Some(&Value::Null));
    assert_eq!(record.get("date"), Some(&Value::Null));
}

#[test]
fn no_flow_marker_means_no_flow_key() {
    let source = FakeSource::with_text("Start here\nCheck the forms\nStory\nmsg");
    let record = run_rules(&source, &empty_ocr());
    assert!(!record.contains_key("Mapping the Flow"));
}

#[test]
fn flow_and_story_sections_extracted_together() {
    let text = "Name Carol\nDate 11/12/2021\nMapping the Flow\nStart here\nFinish up\nStory\nA message\n• first\n• second\n";
    let source = FakeSource::with_text(text);
    let record = run_rules(&source, &empty_ocr());

    assert_eq!(record.name(), Some("Carol"));
    assert_eq!(
        record.get("Mapping the Flow"),
        Some(&serde_json::json!(["Start here", "Finish up"]))
    );
    assert_eq!(record.get("Story").unwrap()["message"], "A message");
}

#[test]
fn record_round_trips_through_json() {
    let text = "Name Dana\nDate 03/04/2022\nMapping the Flow\nStep one\nStory\nmsg\n• act\n";
    let source = FakeSource::with_text(text);
    let record = run_rules(&source, &empty_ocr());

    let json = to_json(&record, JsonFormat::Pretty).unwrap();
    let back: DocumentRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);

    // Key order survives the round trip as well.
    let keys: Vec<&str> = record.keys().collect();
    let back_keys: Vec<&str> = back.keys().collect();
    assert_eq!(keys, back_keys);
}

#[test]
fn pipeline_is_idempotent_without_chain() {
    let source = FakeSource {
        pages: vec![
            "Name Erin\nDate 07/08/2020".to_string(),
            "Story\nmsg\n• one".to_string(),
        ],
        grids: vec![
            vec![grid(vec![
                vec![Some("Col1"), Some("Col2")],
                vec![Some("a"), Some("b")],
                vec![Some("c"), Some("d")],
            ])],
            vec![],
        ],
    };
    let ocr = FakeOcr {
        pages: vec![String::new(), String::new()],
    };

    let first = Extractor::new()
        .run(&source, &ocr, &ocr, &StructuringChain::new(vec![]))
        .unwrap();
    let second = Extractor::new()
        .run(&source, &ocr, &ocr, &StructuringChain::new(vec![]))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn categories_style_wraps_tables() {
    let source = FakeSource::with_grids(vec![grid(vec![
        vec![Some("Col1"), Some("Col2")],
        vec![Some("a"), Some("b")],
        vec![Some("c"), Some("d")],
    ])]);
    let ocr = empty_ocr();

    let options = ExtractOptions::new().with_table_style(TableStyle::Categories);
    let record = Extractor::with_options(options)
        .run(&source, &ocr, &ocr, &StructuringChain::new(vec![]))
        .unwrap();

    assert!(!record.contains_key("tables"));
    assert_eq!(
        record.get("Categories"),
        Some(&serde_json::json!([{"Col1": "a", "Col2": "b"}, {"Col1": "c", "Col2": "d"}]))
    );
}

#[test]
fn non_object_chain_output_falls_back_to_rules() {
    let source = FakeSource::with_text("Name Fred");
    let ocr = empty_ocr();

    let chain = StructuringChain::new(vec![Box::new(FixedProvider {
        result: Ok(serde_json::json!(["not", "an", "object"])),
    })]);
    let record = Extractor::new().run(&source, &ocr, &ocr, &chain).unwrap();

    assert_eq!(record.name(), Some("Fred"));
    assert!(record.contains_key("tables"));
}

#[test]
fn multi_page_text_joined_in_page_order() {
    let source = FakeSource {
        pages: vec!["Name Gail".to_string(), "Date 09/10/2019".to_string()],
        grids: vec![vec![], vec![]],
    };
    let ocr = FakeOcr {
        pages: vec![String::new(), String::new()],
    };

    let record = Extractor::new()
        .run(&source, &ocr, &ocr, &StructuringChain::new(vec![]))
        .unwrap();
    assert_eq!(record.name(), Some("Gail"));
    assert_eq!(record.date(), Some("09/10/2019"));
}

#[test]
fn parallel_ocr_preserves_page_order() {
    let source = FakeSource {
        pages: vec![String::new(), String::new(), String::new()],
        grids: vec![vec![], vec![], vec![]],
    };
    let ocr = FakeOcr {
        pages: vec![
            "A1   B1".to_string(),
            "A2   B2".to_string(),
            "A3   B3".to_string(),
        ],
    };

    let options = ExtractOptions::new().parallel();
    let record = Extractor::with_options(options)
        .run(&source, &ocr, &ocr, &StructuringChain::new(vec![]))
        .unwrap();

    let tables = record.get("tables").unwrap();
    let rows = tables[0].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["col_1"], "A1");
    assert_eq!(rows[1]["col_1"], "A2");
    assert_eq!(rows[2]["col_1"], "A3");
}
