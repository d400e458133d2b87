/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{path::PathBuf, time::{Duration, Instant}};
use tokio::{io::{AsyncReadExt, AsyncWriteExt}, net::{TcpListener, TcpStream}};
use debris_orbital::{
    catalog_source::{check_catalog_text, CatalogQuery, CatalogSource, FileCatalogSource, SpaceTrackConfig, SpaceTrackCredentials, SpaceTrackSource},
    errors::DebrisOrbitalError,
    tle::parse_element_sets
};

/// tests for catalog sources that do not require network access
/// run with "cargo test test_file_source -- --nocapture"

const CATALOG: &str = "\
0 NOAA 21
1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994
2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811
";

fn query()->CatalogQuery {
    CatalogQuery::new( SpaceTrackCredentials::new( "someone@example.com", "secret"), 3, 100).unwrap()
}

#[test]
fn test_check_catalog_text () {
    assert!( check_catalog_text( CATALOG).is_ok());
    assert!( check_catalog_text( "").is_ok());

    for text in [r#"{"error":"You must be logged in to complete this action"}"#, "[]", "\n  <!DOCTYPE html><html></html>"] {
        let res = check_catalog_text( text);
        println!("{text} -> {:?}", res.as_ref().err());
        assert!( res.is_err_and( |e| e.is_fetch_error()));
    }
}

#[test]
fn test_query_constraints () {
    let creds = SpaceTrackCredentials::new( "someone@example.com", "secret");
    assert!( matches!( CatalogQuery::new( creds.clone(), 0, 10), Err(DebrisOrbitalError::ConfigError(_))));
    assert!( matches!( CatalogQuery::new( creds.clone(), 3, 0), Err(DebrisOrbitalError::ConfigError(_))));

    let key = query().key();
    assert_eq!( key.identity, "someone@example.com");
    assert_eq!( key.to_string(), "someone@example.com/3d/100");
}

#[tokio::test]
async fn test_spacetrack_query_url () {
    let config = spacetrack_config( "https://www.space-track.org/", Duration::from_secs(30));
    let source = SpaceTrackSource::new( config.clone()).unwrap();

    let url = source.query_url( &query());
    println!("{url}");
    assert_eq!( source.query_limit(100), 300);
    assert!( url.starts_with("https://www.space-track.org/basicspacedata/query/class/gp/OBJECT_TYPE/DEBRIS/"));
    assert!( url.contains("/EPOCH/%3Enow-3/"));
    assert!( url.contains("/orderby/EPOCH%20desc/limit/300/format/3le"));

    let mut bad = config.clone();
    bad.timeout = Duration::ZERO;
    assert!( SpaceTrackSource::new( bad).is_err());

    let mut bad = config.clone();
    bad.oversample = 0;
    assert!( SpaceTrackSource::new( bad).is_err());

    let mut bad = config;
    bad.base_url = " ".to_string();
    assert!( SpaceTrackSource::new( bad).is_err());
}

fn spacetrack_config (base_url: &str, timeout: Duration)->SpaceTrackConfig {
    SpaceTrackConfig {
        credentials: SpaceTrackCredentials::new( "someone@example.com", "secret"),
        base_url: base_url.to_string(),
        timeout,
        max_cookie_age: Duration::from_secs(3600),
        oversample: 3,
        archive_dir: None,
    }
}

/// a server that accepts connections but never answers
async fn silent_server ()->String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn( async move {
        let mut open: Vec<TcpStream> = Vec::new();
        while let Ok((socket,_)) = listener.accept().await {
            open.push( socket);
        }
    });

    format!("http://{addr}")
}

/// a server that answers every request with a login cookie and a JSON error document
async fn json_error_server ()->String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn( async move {
        while let Ok((mut socket,_)) = listener.accept().await {
            tokio::spawn( async move {
                read_request( &mut socket).await;
                let body = r#"{"error":"query failed"}"#;
                let response = format!("HTTP/1.1 200 OK\r\nSet-Cookie: chocolatechip=1234; path=/\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len());
                let _ = socket.write_all( response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

/// read request head and (content-length) body
async fn read_request (socket: &mut TcpStream) {
    let mut data: Vec<u8> = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let Ok(n) = socket.read( &mut buf).await else { return };
        if n == 0 { return }
        data.extend_from_slice( &buf[..n]);

        let text = String::from_utf8_lossy( &data).to_string();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_len = text[..head_end].lines()
                .find_map( |l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                .and_then( |v| v.parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= head_end + 4 + content_len { return }
        }
    }
}

#[tokio::test]
async fn test_spacetrack_timeout () {
    let base_url = silent_server().await;
    let source = SpaceTrackSource::new( spacetrack_config( &base_url, Duration::from_millis(200))).unwrap();

    let t = Instant::now();
    let res = source.fetch_catalog( &query()).await;
    let elapsed = t.elapsed();
    println!("{:?} after {:?}", res.as_ref().err(), elapsed);

    assert!( res.is_err_and( |e| e.is_fetch_error()));
    assert!( elapsed < Duration::from_secs(5));
}

#[tokio::test]
async fn test_spacetrack_malformed_response () {
    let base_url = json_error_server().await;
    let source = SpaceTrackSource::new( spacetrack_config( &base_url, Duration::from_secs(5))).unwrap();

    let res = source.fetch_catalog( &query()).await;
    println!("{:?}", res.as_ref().err());

    match res {
        Err(DebrisOrbitalError::FetchError(msg)) => assert!( msg.contains("malformed")),
        other => panic!("expected malformed content error, got {other:?}")
    }
}

#[tokio::test]
async fn test_file_source () {
    let dir = std::env::temp_dir().join("debris_orbital_test_source");
    std::fs::create_dir_all( &dir).unwrap();
    let path = dir.join("catalog.3le");
    std::fs::write( &path, CATALOG).unwrap();

    let source = FileCatalogSource::new( &path);
    let text = source.fetch_catalog( &query()).await.unwrap();
    let records = parse_element_sets( &text);
    assert_eq!( records.len(), 1);
    assert_eq!( records[0].name(), Some("NOAA 21"));

    let source = FileCatalogSource::new( PathBuf::from("/no/such/catalog.3le"));
    let res = source.fetch_catalog( &query()).await;
    println!("{:?}", res.as_ref().err());
    assert!( res.is_err_and( |e| e.is_fetch_error()));
}
