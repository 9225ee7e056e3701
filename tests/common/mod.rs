//! Shared fixtures for integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;

pub const BOUNDARY: &str = "survival-insight-test-boundary";

pub const LABELLED_CSV: &str = "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare\n\
1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25\n\
2,1,1,\"Cumings, Mrs. John Bradley\",female,38,1,0,PC 17599,71.2833\n\
3,1,3,\"Heikkinen, Miss. Laina\",female,26,0,0,STON/O2. 3101282,7.925\n\
4,1,1,\"Futrelle, Mrs. Jacques Heath\",female,35,1,0,113803,53.1\n\
5,0,3,\"Allen, Mr. William Henry\",male,35,0,0,373450,8.05\n\
6,0,3,\"Moran, Mr. James\",male,,0,0,330877,8.4583\n\
7,0,1,\"McCarthy, Mr. Timothy J\",male,54,0,0,17463,51.8625\n\
8,0,3,\"Palsson, Master. Gosta Leonard\",male,2,3,1,349909,21.075\n\
9,1,3,\"Johnson, Mrs. Oscar W\",female,27,0,2,347742,11.1333\n\
10,1,2,\"Nasser, Mrs. Nicholas\",female,14,1,0,237736,30.0708\n\
11,1,3,\"Sandstrom, Miss. Marguerite Rut\",female,4,1,1,PP 9549,16.7\n\
12,1,1,\"Bonnell, Miss. Elizabeth\",female,58,0,0,113783,26.55\n\
13,0,3,\"Saundercock, Mr. William Henry\",male,20,0,0,A/5. 2151,8.05\n\
14,0,3,\"Andersson, Mr. Anders Johan\",male,39,1,5,347082,31.275\n";

/// Same passengers as [`LABELLED_CSV`] with every label flipped
pub const FLIPPED_CSV: &str = "PassengerId,Survived,Pclass,Name,Sex,Age,Fare\n\
1,1,3,\"Braund, Mr. Owen Harris\",male,22,7.25\n\
2,0,1,\"Cumings, Mrs. John Bradley\",female,38,71.2833\n\
3,0,3,\"Heikkinen, Miss. Laina\",female,26,7.925\n\
4,0,1,\"Futrelle, Mrs. Jacques Heath\",female,35,53.1\n\
5,1,3,\"Allen, Mr. William Henry\",male,35,8.05\n";

pub const UNLABELLED_CSV: &str = "PassengerId,Pclass,Name,Sex,Age,Fare\n\
892,3,\"Kelly, Mr. James\",male,34.5,7.8292\n\
893,3,\"Wilkes, Mrs. James (Ellen Needs)\",female,47,7\n\
894,2,\"Myles, Mr. Thomas Francis\",male,62,9.6875\n\
895,3,\"Wirz, Mr. Albert\",male,27,8.6625\n\
896,3,\"Hirvonen, Mrs. Alexander\",female,22,12.2875\n\
897,3,\"Svensson, Mr. Johan Cervin\",male,,9.225\n";

/// Multipart body with a single file field
pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart upload to `uri`
pub fn upload_request(uri: &str, field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, filename, content)))
        .unwrap()
}

/// POST a multipart body whose single field has no filename, i.e. a plain
/// form value rather than a file
pub fn form_value_request(uri: &str, field: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
