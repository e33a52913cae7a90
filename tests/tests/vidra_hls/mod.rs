mod interceptor_http;
