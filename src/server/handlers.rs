//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Html,
    Json,
};
use tracing::{info, warn};

use crate::analysis::{AnalysisReport, Upload};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Multipart field carrying the CSV
const FILE_FIELD: &str = "file";

/// Pull the `file` field out of a multipart body
async fn read_upload(mut multipart: Multipart) -> Result<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // a `file` field without a filename is a plain form value, not a file
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        return Ok((file_name, data));
    }

    Err(ServerError::BadRequest("No file part in the request".to_string()))
}

/// Analyze an uploaded passenger CSV: clean, train once if labelled,
/// predict, chart and summarize.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>> {
    let multipart = multipart.map_err(|e| {
        warn!(rejection = %e, "Request is not a multipart upload");
        ServerError::BadRequest("No file part in the request".to_string())
    })?;

    let (file_name, data) = read_upload(multipart).await?;
    if file_name.is_empty() {
        return Err(ServerError::BadRequest("No file selected".to_string()));
    }
    if data.is_empty() {
        return Err(ServerError::BadRequest("Uploaded file is empty".to_string()));
    }

    info!(file = %file_name, bytes = data.len(), "Received file");

    let upload = tokio::task::spawn_blocking(move || Upload::parse(&data))
        .await
        .map_err(|e| ServerError::Internal(format!("Parse task failed: {}", e)))??;

    if upload.has_labels() && !state.is_model_trained().await {
        let mut model = state.model.write().await;
        if upload.train_if_needed(&mut model)? {
            info!(file = %file_name, "Trained session model from upload");
        }
    }

    let model = state.model.read().await;
    let report = upload.report(&model, state.config.prediction_limit)?;
    Ok(Json(report))
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_trained": state.is_model_trained().await,
        "uptime_secs": uptime.num_seconds(),
    }))
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Passenger Survival Insight</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100 text-gray-900 min-h-screen">
    <header class="bg-white border-b px-6 py-4">
        <h1 class="text-xl font-bold">Passenger Survival Insight</h1>
        <p class="text-sm text-gray-500">Upload a passenger CSV. Files with a <code>Survived</code> column train the session model.</p>
    </header>
    <main class="max-w-5xl mx-auto p-6 space-y-6">
        <section id="drop-area" class="bg-white rounded-lg shadow p-6 text-center border-2 border-dashed">
            <input id="csv-file" type="file" accept=".csv" class="hidden">
            <label for="csv-file" id="file-label" class="cursor-pointer text-blue-600">Choose a .csv file or drop it here</label>
            <div class="mt-4">
                <button id="analyze-btn" disabled class="px-4 py-2 rounded bg-blue-600 text-white disabled:opacity-50">Start Analysis</button>
            </div>
            <p id="upload-status" class="mt-4 text-sm"></p>
        </section>
        <section id="results-section" class="hidden space-y-6">
            <div id="results-summary" class="grid grid-cols-3 gap-4"></div>
            <div id="chart-container" class="grid gap-4"></div>
            <div class="bg-white rounded-lg shadow overflow-x-auto">
                <table class="w-full text-left text-sm">
                    <thead><tr class="border-b"><th class="p-3">PassengerId</th><th class="p-3">Name</th><th class="p-3">Prediction</th><th class="p-3">Probability</th></tr></thead>
                    <tbody id="results-table-body"></tbody>
                </table>
            </div>
        </section>
    </main>
<script>
document.addEventListener('DOMContentLoaded', () => {
    const input = document.getElementById('csv-file');
    const label = document.getElementById('file-label');
    const status = document.getElementById('upload-status');
    const button = document.getElementById('analyze-btn');
    const dropArea = document.getElementById('drop-area');
    let uploadedFile = null;

    const setStatus = (msg, ok) => {
        status.textContent = msg;
        status.className = 'mt-4 text-sm ' + (ok ? 'text-green-600' : 'text-red-600');
    };
    const select = (file) => {
        if (!file || !file.name.endsWith('.csv')) { setStatus('Please upload a valid .csv file.', false); return; }
        uploadedFile = file;
        label.textContent = file.name;
        button.disabled = false;
        setStatus('File ready for analysis.', true);
    };
    input.addEventListener('change', (e) => select(e.target.files[0]));
    ['dragenter', 'dragover', 'dragleave', 'drop'].forEach(n => dropArea.addEventListener(n, e => { e.preventDefault(); e.stopPropagation(); }));
    dropArea.addEventListener('drop', (e) => select(e.dataTransfer.files[0]));

    const escape = (v) => String(v).replace(/[&<>"']/g, c => ({'&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'}[c]));

    button.addEventListener('click', async () => {
        if (!uploadedFile) return;
        button.disabled = true;
        button.textContent = 'Analyzing...';
        const form = new FormData();
        form.append('file', uploadedFile);
        try {
            const response = await fetch('/analyze', { method: 'POST', body: form });
            const data = await response.json();
            if (!response.ok) throw new Error(data.error || ('HTTP ' + response.status));
            render(data);
            setStatus(data.summary.model_trained ? 'Analysis complete.' : 'No model trained yet: upload a file with a Survived column.', data.summary.model_trained);
        } catch (err) {
            setStatus('Analysis Error: ' + err.message, false);
        } finally {
            button.disabled = false;
            button.textContent = 'Start Analysis';
        }
    });

    function render({ summary, predictions, charts }) {
        document.getElementById('results-summary').innerHTML = [
            ['Total Passengers', summary.total, ''],
            ['Predicted Survivors', summary.survived, 'text-green-600'],
            ['Predicted Deceased', summary.deceased, 'text-red-600'],
        ].map(([t, v, c]) => `<div class="bg-white rounded-lg shadow p-4 text-center"><p class="text-sm ${c}">${t}</p><p class="text-3xl font-bold">${v}</p></div>`).join('');

        document.getElementById('results-table-body').innerHTML = predictions.map(p => {
            const survived = p.Predicted_Outcome === 1;
            return `<tr class="border-b"><td class="p-3">${escape(p.PassengerId)}</td><td class="p-3">${escape(p.Name)}</td>` +
                `<td class="p-3 font-semibold ${survived ? 'text-green-600' : 'text-red-600'}">${survived ? 'Survived' : 'Did Not Survive'}</td>` +
                `<td class="p-3">${(p.Survival_Probability * 100).toFixed(2)}%</td></tr>`;
        }).join('');

        document.getElementById('chart-container').innerHTML = Object.values(charts || {})
            .map(c => `<div class="bg-white rounded-lg shadow p-4"><img class="mx-auto" alt="Analysis Chart" src="data:image/svg+xml;base64,${c}"></div>`).join('');

        document.getElementById('results-section').classList.remove('hidden');
    }
});
</script>
</body>
</html>
"##;
