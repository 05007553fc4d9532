use super::models::{CellValue, GridRange, SheetInfo};
use super::SpreadsheetService;
use crate::components::google_auth::GoogleApi;
use crate::error::{spreadsheet_error, SummaryResult};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    index: usize,
}

impl From<SheetProperties> for SheetInfo {
    fn from(p: SheetProperties) -> Self {
        SheetInfo {
            sheet_id: p.sheet_id,
            title: p.title,
            index: p.index,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamedRange {
    named_range_id: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<Sheet>,
    #[serde(default)]
    named_ranges: Vec<NamedRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn grid_range(range: &GridRange) -> Value {
    json!({
        "sheetId": range.sheet_id,
        "startRowIndex": range.start_row,
        "endRowIndex": range.end_row,
        "startColumnIndex": range.start_col,
        "endColumnIndex": range.end_col,
    })
}

fn cell_data(value: &CellValue) -> Value {
    match value {
        CellValue::Empty => json!({}),
        CellValue::Text(s) => json!({ "userEnteredValue": { "stringValue": s } }),
        CellValue::Number(n) => json!({ "userEnteredValue": { "numberValue": n } }),
        CellValue::Bool(b) => json!({ "userEnteredValue": { "boolValue": b } }),
        CellValue::Formula(f) => json!({ "userEnteredValue": { "formulaValue": f } }),
    }
}

fn update_cells_request(sheet_id: i64, row: u32, col: u32, values: &[Vec<CellValue>]) -> Value {
    let rows: Vec<Value> = values
        .iter()
        .map(|row| json!({ "values": row.iter().map(cell_data).collect::<Vec<_>>() }))
        .collect();
    json!({
        "updateCells": {
            "start": { "sheetId": sheet_id, "rowIndex": row, "columnIndex": col },
            "rows": rows,
            "fields": "userEnteredValue",
        }
    })
}

fn checkbox_request(range: &GridRange) -> Value {
    json!({
        "setDataValidation": {
            "range": grid_range(range),
            "rule": { "condition": { "type": "BOOLEAN" }, "strict": true },
        }
    })
}

fn bold_request(range: &GridRange) -> Value {
    json!({
        "repeatCell": {
            "range": grid_range(range),
            "cell": { "userEnteredFormat": { "textFormat": { "bold": true } } },
            "fields": "userEnteredFormat.textFormat.bold",
        }
    })
}

fn column_width_request(sheet_id: i64, start_col: u32, count: u32, width: u32) -> Value {
    json!({
        "updateDimensionProperties": {
            "range": {
                "sheetId": sheet_id,
                "dimension": "COLUMNS",
                "startIndex": start_col,
                "endIndex": start_col + count,
            },
            "properties": { "pixelSize": width },
            "fields": "pixelSize",
        }
    })
}

fn sheet_properties_request(properties: Value, fields: &str) -> Value {
    json!({ "updateSheetProperties": { "properties": properties, "fields": fields } })
}

/// Sheets v4 binding
pub struct GoogleSheetsClient {
    api: GoogleApi,
}

impl GoogleSheetsClient {
    pub fn new(api: GoogleApi) -> Self {
        Self { api }
    }

    async fn metadata(&self, document_id: &str, fields: &str) -> SummaryResult<SpreadsheetMeta> {
        let mut url = GoogleApi::endpoint(SHEETS_API, &[document_id], spreadsheet_error)?;
        url.query_pairs_mut().append_pair("fields", fields);
        self.api.json(Method::GET, url, None, spreadsheet_error).await
    }

    async fn batch_update(&self, document_id: &str, requests: Vec<Value>) -> SummaryResult<BatchUpdateResponse> {
        let method = format!("{}:batchUpdate", document_id);
        let url = GoogleApi::endpoint(SHEETS_API, &[&method], spreadsheet_error)?;
        let body = json!({ "requests": requests });
        debug!("Sending {} update requests to {}", requests_len(&body), document_id);
        self.api
            .json(Method::POST, url, Some(&body), spreadsheet_error)
            .await
    }
}

fn requests_len(body: &Value) -> usize {
    body["requests"].as_array().map(Vec::len).unwrap_or(0)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SpreadsheetService for GoogleSheetsClient {
    async fn list_sheets(&self, document_id: &str) -> SummaryResult<Vec<SheetInfo>> {
        let meta = self
            .metadata(document_id, "sheets.properties(sheetId,title,index)")
            .await?;
        let mut sheets: Vec<SheetInfo> = meta.sheets.into_iter().map(|s| s.properties.into()).collect();
        sheets.sort_by_key(|s| s.index);
        Ok(sheets)
    }

    async fn rename_sheet(&self, document_id: &str, sheet_id: i64, title: &str) -> SummaryResult<()> {
        let request = sheet_properties_request(json!({ "sheetId": sheet_id, "title": title }), "title");
        self.batch_update(document_id, vec![request]).await?;
        Ok(())
    }

    async fn insert_sheet(&self, document_id: &str, title: &str) -> SummaryResult<SheetInfo> {
        let request = json!({ "addSheet": { "properties": { "title": title } } });
        let response = self.batch_update(document_id, vec![request]).await?;
        let properties = response
            .replies
            .into_iter()
            .next()
            .and_then(|mut reply| reply.get_mut("addSheet").map(|v| v["properties"].take()))
            .ok_or_else(|| spreadsheet_error("addSheet reply missing sheet properties"))?;
        let properties: SheetProperties = serde_json::from_value(properties)?;
        Ok(properties.into())
    }

    async fn delete_sheet(&self, document_id: &str, sheet_id: i64) -> SummaryResult<()> {
        let request = json!({ "deleteSheet": { "sheetId": sheet_id } });
        self.batch_update(document_id, vec![request]).await?;
        Ok(())
    }

    async fn move_sheet(&self, document_id: &str, sheet_id: i64, index: usize) -> SummaryResult<()> {
        let request = sheet_properties_request(json!({ "sheetId": sheet_id, "index": index }), "index");
        self.batch_update(document_id, vec![request]).await?;
        Ok(())
    }

    async fn activate_sheet(&self, document_id: &str, sheet_id: i64) -> SummaryResult<()> {
        // The REST API has no per-user active sheet; documents open on their first sheet
        self.move_sheet(document_id, sheet_id, 0).await
    }

    async fn write_cells(
        &self,
        document_id: &str,
        sheet_id: i64,
        row: u32,
        col: u32,
        values: &[Vec<CellValue>],
    ) -> SummaryResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let request = update_cells_request(sheet_id, row, col, values);
        self.batch_update(document_id, vec![request]).await?;
        Ok(())
    }

    async fn set_checkbox_validation(&self, document_id: &str, range: &GridRange) -> SummaryResult<()> {
        self.batch_update(document_id, vec![checkbox_request(range)]).await?;
        Ok(())
    }

    async fn set_bold(&self, document_id: &str, range: &GridRange) -> SummaryResult<()> {
        self.batch_update(document_id, vec![bold_request(range)]).await?;
        Ok(())
    }

    async fn set_column_widths(
        &self,
        document_id: &str,
        sheet_id: i64,
        start_col: u32,
        count: u32,
        width: u32,
    ) -> SummaryResult<()> {
        let request = column_width_request(sheet_id, start_col, count, width);
        self.batch_update(document_id, vec![request]).await?;
        Ok(())
    }

    async fn set_named_range(&self, document_id: &str, name: &str, range: &GridRange) -> SummaryResult<()> {
        let meta = self.metadata(document_id, "namedRanges(namedRangeId,name)").await?;

        let mut requests: Vec<Value> = meta
            .named_ranges
            .iter()
            .filter(|r| r.name == name)
            .map(|r| json!({ "deleteNamedRange": { "namedRangeId": r.named_range_id } }))
            .collect();
        requests.push(json!({
            "addNamedRange": { "namedRange": { "name": name, "range": grid_range(range) } }
        }));

        self.batch_update(document_id, requests).await?;
        Ok(())
    }

    async fn read_named_range(&self, document_id: &str, name: &str) -> SummaryResult<Option<Vec<Vec<String>>>> {
        let meta = self.metadata(document_id, "namedRanges(namedRangeId,name)").await?;
        if !meta.named_ranges.iter().any(|r| r.name == name) {
            return Ok(None);
        }

        let url = GoogleApi::endpoint(SHEETS_API, &[document_id, "values", name], spreadsheet_error)?;
        let range: ValueRange = self.api.json(Method::GET, url, None, spreadsheet_error).await?;
        Ok(Some(
            range
                .values
                .iter()
                .map(|row| row.iter().map(value_to_string).collect())
                .collect(),
        ))
    }
}
